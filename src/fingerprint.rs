// Phase 3: SHA-256（JBIG2 グローバルセグメント）
//
// Computes a content fingerprint over a byte buffer so that a downstream writer
// can embed byte-identical JBIG2 globals once. Rendered as lowercase hex.

use std::fmt;

use sha2::{Digest, Sha256};

/// バイト列のコンテンツ指紋（SHA-256）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 64文字の小文字16進数表現。
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 指紋計算エンジン。
///
/// 失敗はデータの問題ではなくエンジン側の問題（利用不可など）を表す。
pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, data: &[u8]) -> crate::error::Result<Fingerprint>;
}

/// 既定の SHA-256 エンジン。
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, data: &[u8]) -> crate::error::Result<Fingerprint> {
        Ok(compute_fingerprint(data))
    }
}

/// バイト列の SHA-256 指紋を計算する。
pub fn compute_fingerprint(data: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Fingerprint(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_hex_is_64_lowercase_chars() {
        let fp = compute_fingerprint(b"globals");
        let hex = fp.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        assert_eq!(fp.to_string(), hex);
    }

    #[test]
    fn test_fingerprint_of_empty_input() {
        // SHA-256("")
        assert_eq!(
            compute_fingerprint(&[]).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
