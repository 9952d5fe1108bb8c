// Phase 3: JBIG2 generic region + globals -> ImageRecord

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::{ImagePayload, ImageRecord, pixel_dimension};
use crate::error::IngestError;
use crate::fingerprint::{Fingerprint, Fingerprinter, Sha256Fingerprinter};

/// 複数の JBIG2 画像で共有されるグローバルセグメント。
///
/// 構築後は不変。指紋は計算に成功した場合のみ存在する。
#[derive(Debug)]
pub struct GlobalSegmentStore {
    bytes: Arc<[u8]>,
    fingerprint: Option<Fingerprint>,
}

impl GlobalSegmentStore {
    /// 既定の SHA-256 エンジンで指紋を計算して構築する。
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::with_fingerprinter(bytes, &Sha256Fingerprinter)
    }

    /// 指紋計算に失敗してもストアは作成する（指紋なし）。
    ///
    /// 指紋は重複排除のための最適化にすぎず、欠落しても
    /// 下流では「常に別物」として扱われるだけである。
    pub fn with_fingerprinter(bytes: impl Into<Arc<[u8]>>, engine: &dyn Fingerprinter) -> Self {
        let bytes = bytes.into();
        let fingerprint = match engine.fingerprint(&bytes) {
            Ok(fp) => Some(fp),
            Err(e) => {
                debug!(error = %e, "JBIG2 globals fingerprint unavailable");
                None
            }
        };
        Self { bytes, fingerprint }
    }

    /// 指紋を計算せずに構築する。
    pub fn without_fingerprint(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            fingerprint: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }
}

enum GlobalsInput {
    Bytes(Arc<[u8]>),
    Shared(Arc<GlobalSegmentStore>),
}

/// JBIG2 画像レコードのビルダー。
pub struct Jbig2Builder {
    width: u32,
    height: u32,
    data: Option<Arc<[u8]>>,
    globals: Option<GlobalsInput>,
    fingerprinter: Option<Arc<dyn Fingerprinter>>,
    fingerprint_globals: bool,
}

impl Jbig2Builder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: None,
            globals: None,
            fingerprinter: None,
            fingerprint_globals: true,
        }
    }

    pub fn data(mut self, data: impl Into<Arc<[u8]>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// グローバルセグメントのバイト列。ビルド時にストアを作成する。
    pub fn globals(mut self, globals: impl Into<Arc<[u8]>>) -> Self {
        self.globals = Some(GlobalsInput::Bytes(globals.into()));
        self
    }

    /// 既存のストアを共有する。
    pub fn shared_globals(mut self, store: Arc<GlobalSegmentStore>) -> Self {
        self.globals = Some(GlobalsInput::Shared(store));
        self
    }

    pub fn fingerprinter(mut self, engine: Arc<dyn Fingerprinter>) -> Self {
        self.fingerprinter = Some(engine);
        self
    }

    pub fn fingerprint_globals(mut self, enabled: bool) -> Self {
        self.fingerprint_globals = enabled;
        self
    }

    pub fn build(self) -> crate::error::Result<ImageRecord> {
        let data = self
            .data
            .ok_or_else(|| IngestError::argument_null("JBIG2 image data is required"))?;
        if self.width == 0 || self.height == 0 {
            return Err(IngestError::invalid_input(format!(
                "JBIG2 image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        let globals = match self.globals {
            None => None,
            Some(GlobalsInput::Shared(store)) => Some(store),
            Some(GlobalsInput::Bytes(bytes)) if !self.fingerprint_globals => {
                Some(Arc::new(GlobalSegmentStore::without_fingerprint(bytes)))
            }
            Some(GlobalsInput::Bytes(bytes)) => {
                let store = match &self.fingerprinter {
                    Some(engine) => GlobalSegmentStore::with_fingerprinter(bytes, engine.as_ref()),
                    None => GlobalSegmentStore::new(bytes),
                };
                Some(Arc::new(store))
            }
        };

        debug!(
            width = self.width,
            height = self.height,
            bytes = data.len(),
            has_globals = globals.is_some(),
            "built JBIG2 image record"
        );

        ImageRecord::new(
            pixel_dimension("width", self.width)?,
            pixel_dimension("height", self.height)?,
            ImagePayload::Jbig2 { data, globals },
        )
    }
}

/// 下流で個別に埋め込む必要のあるグローバルセグメントの数を数える。
///
/// 同じ指紋を持つストアは1つとして数える。指紋のないストアは、同一インスタンスを
/// 共有している場合を除き、常に別物として数える。
pub fn count_distinct_globals<'a>(records: impl IntoIterator<Item = &'a ImageRecord>) -> usize {
    let mut by_fingerprint: HashSet<Fingerprint> = HashSet::new();
    let mut by_identity: HashSet<*const GlobalSegmentStore> = HashSet::new();
    for store in records.into_iter().filter_map(ImageRecord::globals) {
        match store.fingerprint() {
            Some(fp) => {
                by_fingerprint.insert(*fp);
            }
            None => {
                by_identity.insert(Arc::as_ptr(store));
            }
        }
    }
    by_fingerprint.len() + by_identity.len()
}
