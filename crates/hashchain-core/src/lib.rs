//! Chained block hashing and Merkle tree construction, both on top of one
//! SHA-256 hex digest.

pub mod block;
pub mod clock;
pub mod constants;
pub mod error;
pub mod hash;
pub mod merkle;

pub use block::{compute_hash, create_block, create_block_with_clock, Block};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LedgerError, Result};
pub use hash::{digest, digest_parts, is_hex_digest, zero_hash};
pub use merkle::{build_tree, merkle_root, traverse, MerkleNode, MerkleTree, Traverse};
