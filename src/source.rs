// Phase 4: バイトソース（メモリ / ファイル参照）
//
// A byte source can be opened more than once; every `open` starts at offset 0.
// The returned stream is released when it is dropped.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 識別子で参照できる、繰り返し開けるバイトソース。
pub trait ByteSource: Send + Sync {
    /// エラーメッセージに使う識別子（パス、URL など）。
    fn id(&self) -> &str;

    /// 先頭から読む新しいストリームを開く。
    fn open(&self) -> crate::error::Result<Box<dyn Read + '_>>;

    /// メモリ上のソースであれば元のバイト列。
    fn in_memory(&self) -> Option<Arc<[u8]>> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct MemorySource {
    id: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: id.into(),
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> crate::error::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(&self.bytes[..])))
    }

    fn in_memory(&self) -> Option<Arc<[u8]>> {
        Some(Arc::clone(&self.bytes))
    }
}

/// ファイルパスで参照するソース。開くたびにファイルを開き直す。
#[derive(Debug, Clone)]
pub struct FileSource {
    id: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> crate::error::Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
