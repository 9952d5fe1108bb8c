// Phase 1: 設定ファイル・マニフェスト解析テスト

use std::io::Write;

use pdf_image_ingest::config::load_settings_for_manifest;
use pdf_image_ingest::config::manifest::{EntryKind, Manifest, parse_ccitt_type};
use pdf_image_ingest::config::merged::MergedEntryConfig;
use pdf_image_ingest::config::settings::Settings;
use pdf_image_ingest::error::IngestError;
use pdf_image_ingest::image::ccitt::{CcittFlags, CcittKind};

// ============================================================
// 1. CCITT 方式名パーサ
// ============================================================

#[test]
fn test_parse_ccitt_type_known_names() {
    assert_eq!(parse_ccitt_type("g4").unwrap(), CcittKind::G4);
    assert_eq!(parse_ccitt_type("G3_1D").unwrap(), CcittKind::G3_1D);
    assert_eq!(parse_ccitt_type(" g3_2d ").unwrap(), CcittKind::G3_2D);
}

#[test]
fn test_parse_ccitt_type_unknown_name() {
    assert!(parse_ccitt_type("g5").is_err());
    assert!(parse_ccitt_type("").is_err());
}

// ============================================================
// 2. Settings 構造体のデシリアライズ
// ============================================================

#[test]
fn test_settings_full_yaml() {
    let yaml = r#"
reverse_bits: true
fingerprint_globals: false
parallel_workers: 4
"#;
    let settings = Settings::from_yaml(yaml).expect("should parse full YAML");
    assert!(settings.reverse_bits);
    assert!(!settings.fingerprint_globals);
    assert_eq!(settings.parallel_workers, 4);
}

#[test]
fn test_settings_empty_yaml() {
    // 空YAML（"{}" はserde_ymlで空のマッピングを意味する）
    let settings = Settings::from_yaml("{}").expect("should use defaults for empty YAML");
    assert!(!settings.reverse_bits);
    assert!(settings.fingerprint_globals);
    assert_eq!(settings.parallel_workers, 0);
}

#[test]
fn test_settings_invalid_yaml() {
    let result = Settings::from_yaml("parallel_workers: many");
    assert!(result.is_err(), "should fail on non-numeric worker count");
}

// ============================================================
// 3. マニフェストのデシリアライズ
// ============================================================

#[test]
fn test_manifest_ccitt_entry() {
    let yaml = r#"
images:
  - source: "scan.g4"
    kind: ccitt
    width: 1728
    height: 2200
    ccitt:
      type: g4
      black_is_1: true
      end_of_block: true
"#;
    let manifest = Manifest::from_yaml(yaml).expect("should parse ccitt entry");
    assert_eq!(manifest.images.len(), 1);
    let entry = &manifest.images[0];
    assert_eq!(entry.kind, EntryKind::Ccitt);
    assert_eq!(entry.width, Some(1728));
    let params = entry.ccitt.as_ref().expect("ccitt section").parameters();
    assert_eq!(params.kind(), CcittKind::G4);
    assert_eq!(
        params.flags(),
        CcittFlags::BLACK_IS_1 | CcittFlags::END_OF_BLOCK
    );
}

#[test]
fn test_manifest_optional_fields_default_to_none() {
    let yaml = r#"
images:
  - source: "logo.wmf"
    kind: wmf
"#;
    let manifest = Manifest::from_yaml(yaml).expect("should parse minimal entry");
    let entry = &manifest.images[0];
    assert_eq!(entry.kind, EntryKind::Wmf);
    assert!(entry.width.is_none());
    assert!(entry.height.is_none());
    assert!(entry.ccitt.is_none());
    assert!(entry.globals.is_none());
    assert!(entry.reverse_bits.is_none());
    assert!(entry.fingerprint_globals.is_none());
}

#[test]
fn test_manifest_rejects_unknown_ccitt_type() {
    let yaml = r#"
images:
  - source: "scan.fax"
    kind: ccitt
    ccitt:
      type: g9
"#;
    assert!(Manifest::from_yaml(yaml).is_err());
}

#[test]
fn test_manifest_rejects_unknown_kind() {
    let yaml = r#"
images:
  - source: "photo.png"
    kind: png
"#;
    assert!(Manifest::from_yaml(yaml).is_err());
}

#[test]
fn test_manifest_missing_source() {
    // sourceが欠損
    let yaml = r#"
images:
  - kind: jbig2
"#;
    assert!(Manifest::from_yaml(yaml).is_err());
}

// ============================================================
// 4. 設定マージロジック
// ============================================================

fn single_entry(yaml: &str) -> pdf_image_ingest::config::manifest::ImageEntry {
    Manifest::from_yaml(yaml)
        .expect("parse manifest")
        .images
        .remove(0)
}

#[test]
fn test_merge_entry_overrides_settings() {
    let settings = Settings::from_yaml("reverse_bits: false").expect("parse settings");
    let entry = single_entry(
        r#"
images:
  - source: "a.g4"
    kind: ccitt
    reverse_bits: true
    fingerprint_globals: false
"#,
    );
    let merged = MergedEntryConfig::new(&settings, &entry);
    assert!(merged.reverse_bits, "entry reverse_bits should win");
    assert!(!merged.fingerprint_globals);
}

#[test]
fn test_merge_entry_falls_back_to_settings() {
    let settings = Settings::from_yaml("reverse_bits: true").expect("parse settings");
    let entry = single_entry(
        r#"
images:
  - source: "a.g4"
    kind: ccitt
"#,
    );
    let merged = MergedEntryConfig::new(&settings, &entry);
    assert!(merged.reverse_bits);
    assert!(merged.fingerprint_globals);
}

// ============================================================
// 5. settings.yaml の自動検出
// ============================================================

#[test]
fn test_load_settings_next_to_manifest() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut f = std::fs::File::create(dir.path().join("settings.yaml")).expect("create settings");
    writeln!(f, "parallel_workers: 2").expect("write settings");

    let settings =
        load_settings_for_manifest(&dir.path().join("manifest.yaml")).expect("load settings");
    assert_eq!(settings.parallel_workers, 2);
}

#[test]
fn test_load_settings_defaults_when_absent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let settings =
        load_settings_for_manifest(&dir.path().join("manifest.yaml")).expect("load settings");
    assert_eq!(settings.parallel_workers, 0);
    assert!(settings.fingerprint_globals);
}

#[test]
fn test_invalid_yaml_files_name_the_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let settings_path = dir.path().join("settings.yaml");
    std::fs::write(&settings_path, "parallel_workers: [").expect("write settings");
    let manifest_path = dir.path().join("manifest.yaml");
    std::fs::write(&manifest_path, "images: 3").expect("write manifest");

    let err = Settings::from_file(&settings_path).unwrap_err();
    assert!(
        matches!(err, IngestError::ConfigError(ref m) if m.contains("settings") && m.contains("settings.yaml")),
        "got: {err}"
    );

    let err = Manifest::from_file(&manifest_path).unwrap_err();
    assert!(
        matches!(err, IngestError::ConfigError(ref m) if m.contains("manifest") && m.contains("manifest.yaml")),
        "got: {err}"
    );
}

#[test]
fn test_missing_yaml_file_is_io_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = Manifest::from_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, IngestError::IoError(_)));
}
