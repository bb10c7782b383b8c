use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hashchain_core::{
    constants::DEFAULT_NONCE, create_block_with_clock, is_hex_digest, zero_hash, Block, Clock,
    FixedClock, MerkleTree, SystemClock,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

const SEED_NONCE: u64 = 12345;

#[derive(Parser, Debug)]
#[command(name = "hashchain")]
#[command(about = "Chained block hashes and Merkle roots over SHA-256")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chain a block onto a seed block, then print a Merkle tree of four transactions
    Demo {
        /// Pin the block timestamp (Unix seconds) instead of reading the clock
        #[arg(long)]
        timestamp: Option<u64>,
    },
    /// Create one block on top of a previous hash
    Block {
        /// Hash of the previous block; defaults to the zero hash
        #[arg(long)]
        prev: Option<String>,
        /// Pin the block timestamp (Unix seconds) instead of reading the clock
        #[arg(long)]
        timestamp: Option<u64>,
        /// Print the whole block as JSON
        #[arg(long)]
        json: bool,
        /// Transactions, in order
        txs: Vec<String>,
    },
    /// Build a Merkle tree and print its root and structure
    Merkle {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
        /// Records, in order
        records: Vec<String>,
    },
}

fn clock(timestamp: Option<u64>) -> Box<dyn Clock> {
    match timestamp {
        Some(ts) => Box::new(FixedClock(ts)),
        None => Box::new(SystemClock),
    }
}

fn demo(timestamp: Option<u64>) -> Result<()> {
    let clock = clock(timestamp);
    let previous = Block::from_parts(
        vec!["Transaction 1".into(), "Transaction 2".into()],
        zero_hash(),
        clock.now(),
        SEED_NONCE,
    );
    let block = create_block_with_clock(
        clock.as_ref(),
        &previous,
        vec!["Transaction 3".into(), "Transaction 4".into()],
    );
    println!("New Block Hash: {}", block.hash());

    let records = [
        "Transaction 1",
        "Transaction 2",
        "Transaction 3",
        "Transaction 4",
    ];
    let tree = MerkleTree::build(&records).context("building merkle tree")?;
    println!("Merkle Tree:");
    print!("{tree}");
    Ok(())
}

fn block(
    prev: Option<String>,
    timestamp: Option<u64>,
    json: bool,
    txs: Vec<String>,
) -> Result<()> {
    let prev = match prev {
        Some(hash) if is_hex_digest(&hash) => hash,
        Some(hash) => bail!("--prev must be a 64 character lowercase hex digest, got {hash:?}"),
        None => zero_hash(),
    };
    // Only the predecessor's hash is known here, so the block is assembled
    // the same way create_block does it.
    let new_block = Block::from_parts(txs, prev, clock(timestamp).now(), DEFAULT_NONCE);
    debug!(hash = new_block.hash(), "created block");

    if json {
        println!("{}", serde_json::to_string_pretty(&new_block)?);
    } else {
        println!("Block Hash: {}", new_block.hash());
    }
    Ok(())
}

fn merkle(json: bool, records: Vec<String>) -> Result<()> {
    let tree = MerkleTree::build(records.as_slice()).context("building merkle tree")?;
    info!(root = tree.root_hash(), leaves = tree.leaf_count(), "merkle tree ready");

    if json {
        let nodes: Vec<_> = tree
            .traverse()
            .map(|(depth, hash)| json!({ "depth": depth, "hash": hash }))
            .collect();
        let out = json!({
            "root": tree.root_hash(),
            "leaves": tree.leaf_count(),
            "height": tree.height(),
            "nodes": nodes,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Merkle Root: {}", tree.root_hash());
        println!("Merkle Tree:");
        print!("{tree}");
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo { timestamp } => demo(timestamp),
        Command::Block {
            prev,
            timestamp,
            json,
            txs,
        } => block(prev, timestamp, json, txs),
        Command::Merkle { json, records } => merkle(json, records),
    }
}
