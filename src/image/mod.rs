pub mod bits;
pub mod ccitt;
pub mod jbig2;
pub mod template;

use std::sync::{Arc, Weak};

use crate::error::IngestError;
use ccitt::CompressionParameters;
use jbig2::GlobalSegmentStore;
use template::DrawingTemplate;

/// 画像レコードの種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// CCITT Group 3/4 で圧縮済みの生ビットマップ
    Raw,
    Jbig2,
    Template,
    Wmf,
}

/// 種別ごとのペイロード。
///
/// バイト列を持つ種別と、テンプレート参照を持つ種別は排他的。
#[derive(Debug, Clone)]
pub enum ImagePayload {
    Ccitt {
        params: CompressionParameters,
        data: Arc<[u8]>,
    },
    Jbig2 {
        data: Arc<[u8]>,
        globals: Option<Arc<GlobalSegmentStore>>,
    },
    /// 非所有参照。テンプレートの寿命は保持者側が管理する。
    Template(Weak<DrawingTemplate>),
    /// ファイル由来のメタファイルはバイト列を保持しない。
    Wmf { data: Option<Arc<[u8]>> },
}

/// 文書へ埋め込む準備ができた、検証済みの画像レコード。
///
/// 構築後は不変。幅・高さ（ポイント）は常に正の有限値。
#[derive(Debug, Clone)]
pub struct ImageRecord {
    width: f32,
    height: f32,
    dpi: Option<(u32, u32)>,
    payload: ImagePayload,
}

impl ImageRecord {
    pub(crate) fn new(width: f32, height: f32, payload: ImagePayload) -> crate::error::Result<Self> {
        validate_dimension("width", width)?;
        validate_dimension("height", height)?;
        Ok(Self {
            width,
            height,
            dpi: None,
            payload,
        })
    }

    pub(crate) fn with_dpi(mut self, dpi_x: u32, dpi_y: u32) -> Self {
        self.dpi = Some((dpi_x, dpi_y));
        self
    }

    pub fn kind(&self) -> ImageKind {
        match self.payload {
            ImagePayload::Ccitt { .. } => ImageKind::Raw,
            ImagePayload::Jbig2 { .. } => ImageKind::Jbig2,
            ImagePayload::Template(_) => ImageKind::Template,
            ImagePayload::Wmf { .. } => ImageKind::Wmf,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// 解像度（DPI）。メタファイル由来のレコードのみ設定される。
    pub fn dpi(&self) -> Option<(u32, u32)> {
        self.dpi
    }

    pub fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    /// BitsPerComponent 相当の値。
    ///
    /// CCITT では圧縮方式コード（256/257/258）を運ぶ。
    pub fn bits_per_component(&self) -> i32 {
        match &self.payload {
            ImagePayload::Ccitt { params, .. } => params.kind().code(),
            ImagePayload::Jbig2 { .. } => 1,
            ImagePayload::Template(_) | ImagePayload::Wmf { .. } => 0,
        }
    }

    /// ColorSpace 相当の値。CCITT ではパラメータのビットマスクを運ぶ。
    pub fn colorspace_or_flags(&self) -> i32 {
        match &self.payload {
            ImagePayload::Ccitt { params, .. } => params.flags().bits() as i32,
            ImagePayload::Jbig2 { .. } => 1,
            ImagePayload::Template(_) | ImagePayload::Wmf { .. } => 0,
        }
    }

    /// 画像のバイト列。テンプレート画像とファイル由来のメタファイルでは `None`。
    pub fn data(&self) -> Option<&[u8]> {
        match &self.payload {
            ImagePayload::Ccitt { data, .. } | ImagePayload::Jbig2 { data, .. } => Some(&data[..]),
            ImagePayload::Wmf { data } => data.as_deref(),
            ImagePayload::Template(_) => None,
        }
    }

    /// 参照先のテンプレート。既に破棄されていれば `None`。
    pub fn template(&self) -> Option<Arc<DrawingTemplate>> {
        match &self.payload {
            ImagePayload::Template(t) => t.upgrade(),
            _ => None,
        }
    }

    /// JBIG2 のグローバルセグメント。
    pub fn globals(&self) -> Option<&Arc<GlobalSegmentStore>> {
        match &self.payload {
            ImagePayload::Jbig2 { globals, .. } => globals.as_ref(),
            _ => None,
        }
    }
}

/// f32 で正確に表せるピクセル寸法の上限（2^24）。
pub const MAX_PIXEL_DIMENSION: u32 = 1 << 24;

/// ピクセル寸法を f32 に変換する。丸めが起きる値は InvalidInput。
pub(crate) fn pixel_dimension(name: &str, value: u32) -> crate::error::Result<f32> {
    if value > MAX_PIXEL_DIMENSION {
        return Err(IngestError::invalid_input(format!(
            "{name} {value} exceeds the maximum of {MAX_PIXEL_DIMENSION} pixels"
        )));
    }
    Ok(value as f32)
}

fn validate_dimension(name: &str, value: f32) -> crate::error::Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(IngestError::invalid_input(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}
