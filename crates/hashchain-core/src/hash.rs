//! SHA-256 digests rendered as lowercase hex. Blocks and Merkle nodes both
//! hash through [`digest_parts`], so the two never disagree on encoding.

use crate::constants::HASH_HEX_SIZE;
use sha2::{Digest, Sha256};

/// Hex digest of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    digest_parts(&[bytes])
}

/// Hex digest of the concatenation of `parts`, fed to a single hasher.
pub fn digest_parts(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// The all-zero digest used as the predecessor of a genesis block.
pub fn zero_hash() -> String {
    "0".repeat(HASH_HEX_SIZE)
}

/// True when `s` has the exact shape `digest` produces.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HASH_HEX_SIZE && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
