// Phase 4: Aldus Placeable Metafile ヘッダー解析
//
// Wire layout (little-endian, 22 bytes):
//   u32 magic | i16 handle | i16 left | i16 top | i16 right | i16 bottom
//   | u16 inch | u32 reserved | u16 checksum
// Phase 1 consumes the whole prefix so a short header never passes validation.

use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::error::IngestError;
use crate::source::ByteSource;

/// Placeable metafile のマジックナンバー。
pub const PLACEABLE_MAGIC: u32 = 0x9AC6_CDD7;

/// Placeable ヘッダー全体の長さ（バイト）。
pub const PLACEABLE_HEADER_LEN: usize = 22;

/// ポイント換算の解像度。
pub const WMF_DPI: u32 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmfHeader {
    pub magic: u32,
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
    /// 1インチあたりの論理単位数
    pub inch: u16,
}

impl WmfHeader {
    /// ストリームの先頭からヘッダーを読む。マジック不一致は BadFormat。
    pub fn read_from(reader: &mut dyn Read, source_id: &str) -> crate::error::Result<Self> {
        let magic = read_u32(reader, source_id)?;
        if magic != PLACEABLE_MAGIC {
            debug!(source = source_id, magic, "bad WMF magic");
            return Err(IngestError::bad_format(format!(
                "{source_id} is not a valid placeable windows metafile"
            )));
        }

        // hmf（ハンドル）は無視
        read_u16(reader, source_id)?;

        let left = read_u16(reader, source_id)? as i16;
        let top = read_u16(reader, source_id)? as i16;
        let right = read_u16(reader, source_id)? as i16;
        let bottom = read_u16(reader, source_id)? as i16;
        let inch = read_u16(reader, source_id)?;

        // reserved と checksum は検証しない
        read_u32(reader, source_id)?;
        read_u16(reader, source_id)?;

        Ok(Self {
            magic,
            left,
            top,
            right,
            bottom,
            inch,
        })
    }

    /// 72 DPI でのポイント寸法 `(width, height)` を計算する。
    ///
    /// `inch == 0` または外接矩形の幅・高さが正でない場合はエラー。
    pub fn size_in_points(&self, source_id: &str) -> crate::error::Result<(f32, f32)> {
        if self.inch == 0 {
            return Err(IngestError::bad_format(format!(
                "{source_id}: placeable header has a zero units-per-inch scale"
            )));
        }

        let extent_x = i32::from(self.right) - i32::from(self.left);
        let extent_y = i32::from(self.bottom) - i32::from(self.top);
        if extent_x <= 0 || extent_y <= 0 {
            return Err(IngestError::invalid_input(format!(
                "{source_id}: placeable header has an empty bounding box ({}, {}, {}, {})",
                self.left, self.top, self.right, self.bottom
            )));
        }

        let inch = f32::from(self.inch);
        let dpi = WMF_DPI as f32;
        Ok((extent_x as f32 / inch * dpi, extent_y as f32 / inch * dpi))
    }
}

/// ソースを開いてヘッダーを読み、ストリームを閉じる。
///
/// ストリームはこの関数のスコープ内でのみ保持され、成功・失敗いずれの経路でも解放される。
pub fn parse_header(source: &dyn ByteSource) -> crate::error::Result<WmfHeader> {
    let mut stream = source.open()?;
    WmfHeader::read_from(&mut *stream, source.id())
}

fn read_u16(reader: &mut dyn Read, source_id: &str) -> crate::error::Result<u16> {
    let mut buf = [0u8; 2];
    read_header_bytes(reader, &mut buf, source_id)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(reader: &mut dyn Read, source_id: &str) -> crate::error::Result<u32> {
    let mut buf = [0u8; 4];
    read_header_bytes(reader, &mut buf, source_id)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_header_bytes(
    reader: &mut dyn Read,
    buf: &mut [u8],
    source_id: &str,
) -> crate::error::Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => IngestError::bad_format(format!(
            "{source_id}: insufficient bytes for a placeable metafile header"
        )),
        _ => IngestError::IoError(e),
    })
}
