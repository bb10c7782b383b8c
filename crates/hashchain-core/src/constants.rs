pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// Nonce given to every block produced by `create_block`. Never searched.
pub const DEFAULT_NONCE: u64 = 0;
/// Spaces per depth level when rendering a Merkle tree.
pub const RENDER_INDENT: usize = 2;
