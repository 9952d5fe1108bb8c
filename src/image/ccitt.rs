// Phase 2: CCITT Group 3/4 ビットマップ -> ImageRecord

use std::sync::Arc;

use bitflags::bitflags;
use tracing::debug;

use super::bits::reverse_bits;
use super::{ImagePayload, ImageRecord, pixel_dimension};
use crate::error::IngestError;

/// CCITT 圧縮方式。
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CcittKind {
    G4,
    G3_1D,
    G3_2D,
}

impl CcittKind {
    pub const G4_CODE: i32 = 256;
    pub const G3_1D_CODE: i32 = 257;
    pub const G3_2D_CODE: i32 = 258;

    /// 方式コードから変換する。未知のコードは BadFormat。
    pub fn from_code(code: i32) -> crate::error::Result<Self> {
        match code {
            Self::G4_CODE => Ok(Self::G4),
            Self::G3_1D_CODE => Ok(Self::G3_1D),
            Self::G3_2D_CODE => Ok(Self::G3_2D),
            other => Err(IngestError::bad_format(format!(
                "the CCITT compression type must be CCITTG4, CCITTG3_1D or CCITTG3_2D, got {other}"
            ))),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::G4 => Self::G4_CODE,
            Self::G3_1D => Self::G3_1D_CODE,
            Self::G3_2D => Self::G3_2D_CODE,
        }
    }
}

bitflags! {
    /// CCITT デコードパラメータ。任意の組み合わせが有効。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CcittFlags: u32 {
        const BLACK_IS_1 = 1;
        const ENCODED_BYTE_ALIGN = 2;
        const END_OF_LINE = 4;
        const END_OF_BLOCK = 8;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionParameters {
    kind: CcittKind,
    flags: CcittFlags,
}

impl CompressionParameters {
    pub fn new(kind: CcittKind, flags: CcittFlags) -> Self {
        Self { kind, flags }
    }

    /// 生のコード値から構築する。方式コードは検証し、未知のフラグビットは捨てる。
    pub fn from_codes(type_code: i32, flag_bits: u32) -> crate::error::Result<Self> {
        let kind = CcittKind::from_code(type_code)?;
        Ok(Self {
            kind,
            flags: CcittFlags::from_bits_truncate(flag_bits),
        })
    }

    pub fn kind(&self) -> CcittKind {
        self.kind
    }

    pub fn flags(&self) -> CcittFlags {
        self.flags
    }
}

/// CCITT 画像レコードのビルダー。
///
/// データの圧縮構文は検証しない。宣言された方式で正しく符号化されていることは
/// 呼び出し側の責任。
#[derive(Debug, Clone)]
pub struct CcittBuilder {
    width: u32,
    height: u32,
    reverse_bits: bool,
    params: CompressionParameters,
    data: Option<Vec<u8>>,
}

impl CcittBuilder {
    pub fn new(width: u32, height: u32, params: CompressionParameters) -> Self {
        Self {
            width,
            height,
            reverse_bits: false,
            params,
            data: None,
        }
    }

    /// 格納前にビット順を反転するか（FillOrder=2 のデータ）。
    pub fn reverse_bits(mut self, reverse: bool) -> Self {
        self.reverse_bits = reverse;
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn build(self) -> crate::error::Result<ImageRecord> {
        let mut data = self
            .data
            .ok_or_else(|| IngestError::argument_null("CCITT image data is required"))?;
        if data.is_empty() {
            return Err(IngestError::invalid_input("CCITT image data is empty"));
        }
        if self.width == 0 || self.height == 0 {
            debug!(
                width = self.width,
                height = self.height,
                "rejecting CCITT image with zero dimension"
            );
            return Err(IngestError::invalid_input(format!(
                "CCITT image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.reverse_bits {
            reverse_bits(&mut data);
        }

        debug!(
            width = self.width,
            height = self.height,
            kind = ?self.params.kind(),
            bytes = data.len(),
            "built CCITT image record"
        );

        ImageRecord::new(
            pixel_dimension("width", self.width)?,
            pixel_dimension("height", self.height)?,
            ImagePayload::Ccitt {
                params: self.params,
                data: Arc::from(data),
            },
        )
    }
}

/// 方式コードとフラグビットを直接受け取って CCITT 画像を構築する。
pub fn build_ccitt(
    width: u32,
    height: u32,
    reverse_bits: bool,
    type_code: i32,
    flag_bits: u32,
    data: &[u8],
) -> crate::error::Result<ImageRecord> {
    let params = CompressionParameters::from_codes(type_code, flag_bits)?;
    CcittBuilder::new(width, height, params)
        .reverse_bits(reverse_bits)
        .data(data)
        .build()
}
