//! Output whitening primitives
//!
//! Extracted pool material is hashed before leaving the system, so output
//! blocks are fixed-length and uniformly-distributed-looking regardless of
//! how many pool bits seeded them. Any fixed-digest hash satisfies the
//! contract; SHA-1 is the default.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Digest used for output whitening
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WhitenerKind {
    /// SHA-1, 160-bit digests
    Sha1,
    /// SHA-256, 256-bit digests
    Sha256,
}

impl Default for WhitenerKind {
    fn default() -> Self {
        Self::Sha1
    }
}

/// Hash whitener with a fixed digest length
#[derive(Debug, Clone, Copy)]
pub struct Whitener {
    kind: WhitenerKind,
}

impl Whitener {
    /// Create a whitener using the given digest
    pub fn new(kind: WhitenerKind) -> Self {
        Self { kind }
    }

    /// Digest length in bytes
    pub fn digest_len(&self) -> usize {
        match self.kind {
            WhitenerKind::Sha1 => 20,
            WhitenerKind::Sha256 => 32,
        }
    }

    /// Hash arbitrary bytes and return the raw digest
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self.kind {
            WhitenerKind::Sha1 => Sha1::digest(data).to_vec(),
            WhitenerKind::Sha256 => Sha256::digest(data).to_vec(),
        }
    }

    /// Hash an extracted sequence.
    ///
    /// The sequence is rendered as its canonical decimal string and the
    /// string's bytes are digested, so the same sequence always whitens to
    /// the same block.
    pub fn whiten_sequence(&self, seq: &BigUint) -> Vec<u8> {
        self.digest(seq.to_string().as_bytes())
    }
}

impl Default for Whitener {
    fn default() -> Self {
        Self::new(WhitenerKind::default())
    }
}

/// Encode bytes to hexadecimal string
pub fn encode_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_lengths() {
        assert_eq!(Whitener::new(WhitenerKind::Sha1).digest_len(), 20);
        assert_eq!(Whitener::new(WhitenerKind::Sha256).digest_len(), 32);
    }

    #[test]
    fn test_sha1_known_vector() {
        let w = Whitener::new(WhitenerKind::Sha1);
        assert_eq!(
            encode_hex(&w.digest(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_sha256_known_vector() {
        let w = Whitener::new(WhitenerKind::Sha256);
        assert_eq!(
            encode_hex(&w.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_whiten_sequence_uses_decimal_text() {
        let w = Whitener::default();
        let seq = BigUint::from(12345u32);
        assert_eq!(w.whiten_sequence(&seq), w.digest(b"12345"));
    }

    #[test]
    fn test_whiten_sequence_zero() {
        let w = Whitener::default();
        let seq = BigUint::from(0u32);
        assert_eq!(w.whiten_sequence(&seq), w.digest(b"0"));
    }

    #[test]
    fn test_default_is_sha1() {
        assert_eq!(WhitenerKind::default(), WhitenerKind::Sha1);
        assert_eq!(Whitener::default().digest_len(), 20);
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(encode_hex(b"hello"), "68656c6c6f");
        assert_eq!(encode_hex(&[]), "");
    }
}
