// Phase 7: エントリ単位: ソース読込 -> 画像ビルダー -> ImageRecord

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::manifest::{EntryKind, ImageEntry};
use crate::config::merged::MergedEntryConfig;
use crate::error::IngestError;
use crate::image::ImageRecord;
use crate::image::ccitt::CcittBuilder;
use crate::image::jbig2::{GlobalSegmentStore, Jbig2Builder};
use crate::source::FileSource;
use crate::wmf::WmfImage;

/// Configuration for a single image entry, with paths already resolved.
#[derive(Debug, Clone)]
pub struct IngestJob {
    pub source_path: PathBuf,
    pub globals_path: Option<PathBuf>,
    pub entry: ImageEntry,
    pub config: MergedEntryConfig,
}

impl IngestJob {
    /// マニフェストのエントリから、相対パスを `base_dir` 基準で解決して作成する。
    pub fn new(base_dir: &Path, entry: ImageEntry, config: MergedEntryConfig) -> Self {
        let source_path = resolve_path(base_dir, &entry.source);
        let globals_path = entry.globals.as_deref().map(|g| resolve_path(base_dir, g));
        Self {
            source_path,
            globals_path,
            entry,
            config,
        }
    }
}

/// Result of ingesting a single image.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub source_path: PathBuf,
    pub record: ImageRecord,
}

/// 同じグローバルセグメントファイルを参照するエントリ間で共有するストア。
///
/// キーは（解決済みパス, 指紋計算の有無）。
#[derive(Debug, Default)]
pub struct SharedGlobals {
    stores: HashMap<(PathBuf, bool), Arc<GlobalSegmentStore>>,
}

impl SharedGlobals {
    /// 参照されているグローバルセグメントファイルをそれぞれ1回だけ読み込む。
    ///
    /// 読めなかったファイルは登録しない。該当エントリは取り込み時に自分で読み、
    /// そのエラーを報告する。
    pub fn load(jobs: &[IngestJob]) -> Self {
        let mut stores = HashMap::new();
        for job in jobs {
            let Some(key) = globals_key(job) else {
                continue;
            };
            if stores.contains_key(&key) {
                continue;
            }
            match std::fs::read(&key.0) {
                Ok(bytes) => {
                    let store = if key.1 {
                        GlobalSegmentStore::new(bytes)
                    } else {
                        GlobalSegmentStore::without_fingerprint(bytes)
                    };
                    stores.insert(key, Arc::new(store));
                }
                Err(e) => {
                    debug!(path = %key.0.display(), error = %e, "JBIG2 globals not preloaded");
                }
            }
        }
        Self { stores }
    }

    pub fn get(&self, job: &IngestJob) -> Option<Arc<GlobalSegmentStore>> {
        globals_key(job).and_then(|key| self.stores.get(&key).cloned())
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

fn globals_key(job: &IngestJob) -> Option<(PathBuf, bool)> {
    if job.entry.kind != EntryKind::Jbig2 {
        return None;
    }
    job.globals_path
        .clone()
        .map(|path| (path, job.config.fingerprint_globals))
}

/// Build one image record from a manifest entry.
pub fn ingest_entry(job: &IngestJob) -> crate::error::Result<IngestResult> {
    ingest_entry_shared(job, &SharedGlobals::default())
}

/// Build one image record, reusing a preloaded globals store when one exists.
pub fn ingest_entry_shared(
    job: &IngestJob,
    shared: &SharedGlobals,
) -> crate::error::Result<IngestResult> {
    debug!(source = %job.source_path.display(), kind = ?job.entry.kind, "ingesting image");

    let record = match job.entry.kind {
        EntryKind::Ccitt => ingest_ccitt(job)?,
        EntryKind::Jbig2 => ingest_jbig2(job, shared)?,
        EntryKind::Wmf => WmfImage::parse(FileSource::new(&job.source_path))?.into_record(),
    };

    Ok(IngestResult {
        source_path: job.source_path.clone(),
        record,
    })
}

fn ingest_ccitt(job: &IngestJob) -> crate::error::Result<ImageRecord> {
    let (width, height) = required_dimensions(job)?;
    let options = job.entry.ccitt.as_ref().ok_or_else(|| {
        IngestError::config(format!(
            "{}: ccitt entry requires a 'ccitt' section",
            job.source_path.display()
        ))
    })?;
    let data = std::fs::read(&job.source_path)?;

    CcittBuilder::new(width, height, options.parameters())
        .reverse_bits(job.config.reverse_bits)
        .data(data)
        .build()
}

fn ingest_jbig2(job: &IngestJob, shared: &SharedGlobals) -> crate::error::Result<ImageRecord> {
    let (width, height) = required_dimensions(job)?;
    let data = std::fs::read(&job.source_path)?;

    let mut builder = Jbig2Builder::new(width, height)
        .data(data)
        .fingerprint_globals(job.config.fingerprint_globals);
    if let Some(store) = shared.get(job) {
        builder = builder.shared_globals(store);
    } else if let Some(globals_path) = &job.globals_path {
        builder = builder.globals(std::fs::read(globals_path)?);
    }
    builder.build()
}

fn required_dimensions(job: &IngestJob) -> crate::error::Result<(u32, u32)> {
    match (job.entry.width, job.entry.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(IngestError::config(format!(
            "{}: {:?} entry requires width and height",
            job.source_path.display(),
            job.entry.kind
        ))),
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
pub fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
