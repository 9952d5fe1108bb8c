use super::manifest::ImageEntry;
use super::settings::Settings;

#[derive(Debug, Clone)]
pub struct MergedEntryConfig {
    pub reverse_bits: bool,
    pub fingerprint_globals: bool,
}

impl MergedEntryConfig {
    /// エントリのOption値がSomeならエントリの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &Settings, entry: &ImageEntry) -> Self {
        MergedEntryConfig {
            reverse_bits: entry.reverse_bits.unwrap_or(settings.reverse_bits),
            fingerprint_globals: entry
                .fingerprint_globals
                .unwrap_or(settings.fingerprint_globals),
        }
    }
}
