use std::path::Path;

use serde::Deserialize;

use crate::error::IngestError;
use crate::image::ccitt::{CcittFlags, CcittKind, CompressionParameters};

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub images: Vec<ImageEntry>,
}

impl Manifest {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        super::parse_yaml(yaml, "manifest")
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        super::read_yaml_file(path, "manifest")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Ccitt,
    Jbig2,
    Wmf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub source: String,
    pub kind: EntryKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub ccitt: Option<CcittOptions>,
    /// JBIG2 グローバルセグメントのファイル
    pub globals: Option<String>,
    pub reverse_bits: Option<bool>,
    pub fingerprint_globals: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CcittOptions {
    #[serde(rename = "type", deserialize_with = "deserialize_ccitt_kind")]
    pub kind: CcittKind,
    #[serde(default)]
    pub black_is_1: bool,
    #[serde(default)]
    pub encoded_byte_align: bool,
    #[serde(default)]
    pub end_of_line: bool,
    #[serde(default)]
    pub end_of_block: bool,
}

impl CcittOptions {
    pub fn parameters(&self) -> CompressionParameters {
        let mut flags = CcittFlags::empty();
        flags.set(CcittFlags::BLACK_IS_1, self.black_is_1);
        flags.set(CcittFlags::ENCODED_BYTE_ALIGN, self.encoded_byte_align);
        flags.set(CcittFlags::END_OF_LINE, self.end_of_line);
        flags.set(CcittFlags::END_OF_BLOCK, self.end_of_block);
        CompressionParameters::new(self.kind, flags)
    }
}

/// CCITT 方式名をパースする。
///
/// 形式: `"g4"`, `"g3_1d"`, `"g3_2d"`（大文字小文字は区別しない）
pub fn parse_ccitt_type(s: &str) -> crate::error::Result<CcittKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "g4" => Ok(CcittKind::G4),
        "g3_1d" => Ok(CcittKind::G3_1D),
        "g3_2d" => Ok(CcittKind::G3_2D),
        other => Err(IngestError::config(format!(
            "Invalid CCITT type: '{other}' (expected g4, g3_1d or g3_2d)"
        ))),
    }
}

/// serdeのdeserialize_withで使用するCCITT方式デシリアライザ
fn deserialize_ccitt_kind<'de, D>(deserializer: D) -> Result<CcittKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_ccitt_type(&s).map_err(serde::de::Error::custom)
}
