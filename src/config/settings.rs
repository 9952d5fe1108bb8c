use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reverse_bits: bool,
    pub fingerprint_globals: bool,
    pub parallel_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            reverse_bits: false,
            fingerprint_globals: true,
            parallel_workers: 0,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        super::parse_yaml(yaml, "settings")
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        super::read_yaml_file(path, "settings")
    }
}
