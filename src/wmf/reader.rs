// Phase 4: メタファイル本体のストリーミング（テンプレートへの書き出し）

use std::io::{ErrorKind, Read};

use crate::error::IngestError;

use super::header::PLACEABLE_HEADER_LEN;

/// 標準メタファイルヘッダー（METAHEADER）の長さ（バイト）。
pub const META_HEADER_LEN: usize = 18;

/// META_EOF レコードの関数番号。
pub const META_EOF: u16 = 0x0000;

/// レコードヘッダー（u32 サイズ + u16 関数番号）の長さ（ワード）。
const RECORD_HEADER_WORDS: u32 = 3;

/// 1レコードのパラメータ上限（バイト）
const MAX_RECORD_PARAMS: u64 = 64 * 1024 * 1024;

/// メタファイルの1レコード。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRecord {
    pub function: u16,
    pub params: Vec<u8>,
}

/// メタファイルの描画先。
pub trait RenderTarget {
    /// 描画先の寸法（ポイント）を設定する。
    fn set_size(&mut self, width: f32, height: f32);

    /// レコードを1つ受け取る。
    fn draw(&mut self, record: &MetaRecord) -> crate::error::Result<()>;
}

/// メタファイル本体を描画先へ流し込むインタプリタ。
///
/// `stream` は placeable ヘッダーの直後に位置している。
pub trait MetafileInterpreter {
    fn paint(
        &mut self,
        stream: &mut dyn Read,
        target: &mut dyn RenderTarget,
        source_id: &str,
    ) -> crate::error::Result<()>;
}

/// レコードを解釈せずに順に描画先へ渡す既定のインタプリタ。
///
/// META_EOF レコードかストリーム終端（レコード境界）で停止する。
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordWalker;

impl MetafileInterpreter for RecordWalker {
    fn paint(
        &mut self,
        stream: &mut dyn Read,
        target: &mut dyn RenderTarget,
        source_id: &str,
    ) -> crate::error::Result<()> {
        let mut meta_header = [0u8; META_HEADER_LEN];
        stream
            .read_exact(&mut meta_header)
            .map_err(|e| truncated(e, source_id, "metafile header"))?;

        loop {
            let mut size_buf = [0u8; 4];
            match read_full(stream, &mut size_buf)? {
                0 => return Ok(()),
                4 => {}
                _ => {
                    return Err(IngestError::bad_format(format!(
                        "{source_id}: truncated metafile record header"
                    )));
                }
            }
            let size_words = u32::from_le_bytes(size_buf);

            let mut func_buf = [0u8; 2];
            stream
                .read_exact(&mut func_buf)
                .map_err(|e| truncated(e, source_id, "metafile record header"))?;
            let function = u16::from_le_bytes(func_buf);

            if function == META_EOF {
                return Ok(());
            }
            if size_words < RECORD_HEADER_WORDS {
                return Err(IngestError::bad_format(format!(
                    "{source_id}: metafile record {function:#06x} has invalid size {size_words}"
                )));
            }

            let param_len = u64::from(size_words - RECORD_HEADER_WORDS) * 2;
            if param_len > MAX_RECORD_PARAMS {
                return Err(IngestError::bad_format(format!(
                    "{source_id}: metafile record {function:#06x} is too large ({param_len} bytes)"
                )));
            }

            let mut params = Vec::new();
            (&mut *stream).take(param_len).read_to_end(&mut params)?;
            if params.len() as u64 != param_len {
                return Err(IngestError::bad_format(format!(
                    "{source_id}: truncated metafile record {function:#06x}"
                )));
            }

            target.draw(&MetaRecord { function, params })?;
        }
    }
}

/// placeable ヘッダーを読み飛ばす。
pub(crate) fn skip_placeable_header(
    stream: &mut dyn Read,
    source_id: &str,
) -> crate::error::Result<()> {
    let mut header = [0u8; PLACEABLE_HEADER_LEN];
    stream
        .read_exact(&mut header)
        .map_err(|e| truncated(e, source_id, "placeable metafile header"))
}

/// バッファが埋まるかストリーム終端に達するまで読み、読めたバイト数を返す。
fn read_full(stream: &mut dyn Read, buf: &mut [u8]) -> crate::error::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn truncated(e: std::io::Error, source_id: &str, what: &str) -> IngestError {
    if e.kind() == ErrorKind::UnexpectedEof {
        IngestError::bad_format(format!("{source_id}: insufficient bytes for {what}"))
    } else {
        IngestError::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        records: Vec<MetaRecord>,
    }

    impl RenderTarget for Collect {
        fn set_size(&mut self, _width: f32, _height: f32) {}

        fn draw(&mut self, record: &MetaRecord) -> crate::error::Result<()> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    fn record(function: u16, params: &[u8]) -> Vec<u8> {
        let words = 3 + (params.len() as u32) / 2;
        let mut out = words.to_le_bytes().to_vec();
        out.extend_from_slice(&function.to_le_bytes());
        out.extend_from_slice(params);
        out
    }

    #[test]
    fn test_walker_stops_at_eof_record() {
        let mut body = vec![0u8; META_HEADER_LEN];
        body.extend(record(0x0103, &[0x08, 0x00]));
        body.extend(record(META_EOF, &[]));
        body.extend(record(0x0201, &[0, 0, 0, 0]));

        let mut target = Collect::default();
        RecordWalker
            .paint(&mut &body[..], &mut target, "mem")
            .expect("walk");
        assert_eq!(target.records.len(), 1);
        assert_eq!(target.records[0].function, 0x0103);
        assert_eq!(target.records[0].params, vec![0x08, 0x00]);
    }

    #[test]
    fn test_walker_rejects_undersized_record() {
        let mut body = vec![0u8; META_HEADER_LEN];
        body.extend(2u32.to_le_bytes());
        body.extend(0x0103u16.to_le_bytes());

        let mut target = Collect::default();
        let err = RecordWalker
            .paint(&mut &body[..], &mut target, "mem")
            .unwrap_err();
        assert!(matches!(err, IngestError::BadFormat(_)));
    }
}
