pub mod manifest;
pub mod merged;
pub mod settings;

use serde::de::DeserializeOwned;
use settings::Settings;
use std::path::Path;

use crate::error::IngestError;

/// YAML 文字列を読み込む。`what` はエラーメッセージに使う文書名。
pub(crate) fn parse_yaml<T: DeserializeOwned>(yaml: &str, what: &str) -> crate::error::Result<T> {
    serde_yml::from_str(yaml)
        .map_err(|e| IngestError::config(format!("Failed to parse {what} YAML: {e}")))
}

/// YAML ファイルを読み込む。パースエラーにはファイルパスを含める。
pub(crate) fn read_yaml_file<T: DeserializeOwned>(
    path: &Path,
    what: &str,
) -> crate::error::Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_yml::from_str(&content).map_err(|e| {
        IngestError::config(format!(
            "Failed to parse {what} YAML {}: {e}",
            path.display()
        ))
    })
}

/// マニフェストのパスからsettings.yamlを自動検出して読み込む。
///
/// マニフェストと同じディレクトリに `settings.yaml` が存在すれば読み込み、
/// 存在しなければデフォルト設定を返す。
pub fn load_settings_for_manifest(manifest_path: &Path) -> crate::error::Result<Settings> {
    let dir = manifest_path
        .parent()
        .ok_or_else(|| IngestError::config("Cannot determine manifest directory"))?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
