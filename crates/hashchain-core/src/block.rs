use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_NONCE;
use crate::hash::{digest_parts, zero_hash};
use serde::Serialize;
use tracing::debug;

/// One entry of the chain. The hash is computed when the block is built and
/// there is no way to change any field afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    data: Vec<String>,
    hash: String,
    previous_hash: String,
    timestamp: u64,
    nonce: u64,
}

impl Block {
    /// Build a block from explicit fields and hash it.
    pub fn from_parts(
        data: Vec<String>,
        previous_hash: impl Into<String>,
        timestamp: u64,
        nonce: u64,
    ) -> Self {
        let mut block = Self {
            data,
            hash: String::new(),
            previous_hash: previous_hash.into(),
            timestamp,
            nonce,
        };
        block.hash = compute_hash(&block);
        block
    }

    /// Empty block at timestamp 0 whose predecessor is the zero hash.
    pub fn genesis() -> Self {
        Self::from_parts(Vec::new(), zero_hash(), 0, DEFAULT_NONCE)
    }

    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn compute_hash(&self) -> String {
        compute_hash(self)
    }

    /// Stored hash still matches the fields.
    pub fn is_consistent(&self) -> bool {
        self.compute_hash() == self.hash
    }
}

/// Digest of `previous_hash ++ data[0] ++ .. ++ data[n] ++ timestamp ++ nonce`,
/// numbers in decimal.
///
/// Records are joined without a delimiter, so `["ab", "c"]` and `["a", "bc"]`
/// hash the same. Existing block hashes depend on this layout.
pub fn compute_hash(block: &Block) -> String {
    let timestamp = block.timestamp.to_string();
    let nonce = block.nonce.to_string();

    let mut parts: Vec<&[u8]> = Vec::with_capacity(block.data.len() + 3);
    parts.push(block.previous_hash.as_bytes());
    parts.extend(block.data.iter().map(|tx| tx.as_bytes()));
    parts.push(timestamp.as_bytes());
    parts.push(nonce.as_bytes());
    digest_parts(&parts)
}

/// Create the successor of `previous`, stamped with the system clock.
pub fn create_block(previous: &Block, transactions: Vec<String>) -> Block {
    create_block_with_clock(&SystemClock, previous, transactions)
}

pub fn create_block_with_clock<C: Clock>(
    clock: C,
    previous: &Block,
    transactions: Vec<String>,
) -> Block {
    let block = Block::from_parts(
        transactions,
        previous.hash.clone(),
        clock.now(),
        DEFAULT_NONCE,
    );
    debug!(
        hash = %block.hash,
        previous = %block.previous_hash,
        txs = block.data.len(),
        timestamp = block.timestamp,
        "created block"
    );
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::hash::{digest, is_hex_digest};

    fn txs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn genesis_block_example() {
        let genesis = Block::genesis();
        assert!(genesis.data().is_empty());
        assert_eq!(genesis.previous_hash(), zero_hash());
        assert_eq!(genesis.timestamp(), 0);
        assert_eq!(genesis.nonce(), 0);
        assert_eq!(
            genesis.hash(),
            "d5f28bdae4731c38abc064bc702233257035309462dbeaa891f9e8f33df6d78e"
        );
    }

    #[test]
    fn block_hash_example() {
        let genesis = Block::genesis();
        let block = create_block_with_clock(
            FixedClock(1_700_000_000),
            &genesis,
            txs(&["Transaction 3", "Transaction 4"]),
        );
        assert_eq!(
            block.hash(),
            "24aec1adc3885673bb43f9bd8649ef143cd70d9e1c84971f8f4a8cb4d273c029"
        );
    }

    #[test]
    fn compute_hash_field_order() {
        let block = Block::from_parts(txs(&["x", "y"]), "prev", 7, 42);
        assert_eq!(block.hash(), digest(b"prevxy742"));
        assert_eq!(compute_hash(&block), block.hash());
    }

    #[test]
    fn create_block_links_to_previous() {
        let genesis = Block::genesis();
        let b1 = create_block(&genesis, txs(&["Transaction 1"]));
        let b2 = create_block(&b1, txs(&["Transaction 2"]));
        assert_eq!(b1.previous_hash(), genesis.hash());
        assert_eq!(b2.previous_hash(), b1.hash());
        assert_eq!(b2.nonce(), DEFAULT_NONCE);
        assert_eq!(b2.data(), &txs(&["Transaction 2"])[..]);
        assert!(is_hex_digest(b2.hash()));
    }

    #[test]
    fn block_hash_consistency() {
        let block = create_block(&Block::genesis(), txs(&["Alice->Bob:10", "Bob->Carol:5"]));
        assert!(block.is_consistent());
        assert_eq!(block.compute_hash(), block.compute_hash());
    }

    #[test]
    fn timestamp_participates_in_hash() {
        let prev = Block::genesis();
        let data = txs(&["Transaction 1", "Transaction 2"]);
        let a = create_block_with_clock(FixedClock(100), &prev, data.clone());
        let b = create_block_with_clock(FixedClock(100), &prev, data.clone());
        let c = create_block_with_clock(FixedClock(101), &prev, data);
        assert_eq!(a, b);
        assert_eq!(a.data(), c.data());
        assert_eq!(a.previous_hash(), c.previous_hash());
        assert_eq!(a.nonce(), c.nonce());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn same_second_blocks_share_hash() {
        let prev = Block::genesis();
        let data = txs(&["Transaction 1"]);
        let a = create_block(&prev, data.clone());
        let b = create_block(&prev, data);
        assert_eq!(a.hash() == b.hash(), a.timestamp() == b.timestamp());
    }

    #[test]
    fn block_hash_changes_with_nonce() {
        let a = Block::from_parts(txs(&["t"]), zero_hash(), 1_600_000_200, 0);
        let b = Block::from_parts(txs(&["t"]), zero_hash(), 1_600_000_200, 1);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn record_boundaries_do_not_reach_the_hash() {
        let a = Block::from_parts(txs(&["ab", "c"]), zero_hash(), 5, 0);
        let b = Block::from_parts(txs(&["a", "bc"]), zero_hash(), 5, 0);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn block_serialization_example() {
        let block = Block::from_parts(txs(&["t1"]), "p", 3, 9);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["data"], serde_json::json!(["t1"]));
        assert_eq!(json["previous_hash"], "p");
        assert_eq!(json["timestamp"], 3);
        assert_eq!(json["nonce"], 9);
        assert_eq!(json["hash"], block.hash());
    }
}
