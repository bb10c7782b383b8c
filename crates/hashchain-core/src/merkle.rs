//! Binary Merkle tree over ordered string records.
//!
//! Leaves hash the raw record, internal nodes hash the concatenation of their
//! children's hex digests. A level with an odd number of nodes pairs its last
//! node with a copy of itself, so every internal node has exactly two
//! children and a lone `h` is promoted as `digest(h ++ h)`.

use crate::constants::RENDER_INDENT;
use crate::error::{LedgerError, Result};
use crate::hash::{digest, digest_parts};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MerkleNode {
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<Box<MerkleNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<Box<MerkleNode>>,
}

impl MerkleNode {
    pub fn leaf(record: impl AsRef<str>) -> Self {
        Self {
            hash: digest(record.as_ref().as_bytes()),
            left: None,
            right: None,
        }
    }

    pub fn internal(left: MerkleNode, right: MerkleNode) -> Self {
        Self {
            hash: digest_parts(&[left.hash.as_bytes(), right.hash.as_bytes()]),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn left(&self) -> Option<&MerkleNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&MerkleNode> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn traverse(&self) -> Traverse<'_> {
        traverse(self)
    }
}

/// Reduce `records` to a single root node.
///
/// Fails with [`LedgerError::InvalidInput`] when `records` is empty.
pub fn build_tree<S: AsRef<str>>(records: &[S]) -> Result<MerkleNode> {
    if records.is_empty() {
        return Err(LedgerError::InvalidInput(
            "cannot build a Merkle tree from an empty record list".into(),
        ));
    }

    let mut level: Vec<MerkleNode> = records.iter().map(MerkleNode::leaf).collect();
    let mut depth = 0usize;

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            let right = match nodes.next() {
                Some(right) => right,
                None => left.clone(),
            };
            next.push(MerkleNode::internal(left, right));
        }
        depth += 1;
        trace!(level = depth, nodes = next.len(), "merkle level built");
        level = next;
    }

    let root = level.pop().ok_or_else(|| {
        LedgerError::InvalidInput("merkle reduction produced no root".into())
    })?;
    debug!(leaves = records.len(), height = depth, root = %root.hash, "merkle tree built");
    Ok(root)
}

/// Pre-order walk (node, left, right) yielding `(depth, hash)`, root at depth 0.
pub fn traverse(root: &MerkleNode) -> Traverse<'_> {
    Traverse {
        stack: vec![(0, root)],
    }
}

#[derive(Clone, Debug)]
pub struct Traverse<'a> {
    stack: Vec<(usize, &'a MerkleNode)>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // right first so left is popped next
        if let Some(right) = node.right() {
            self.stack.push((depth + 1, right));
        }
        if let Some(left) = node.left() {
            self.stack.push((depth + 1, left));
        }
        Some((depth, node.hash()))
    }
}

/// A built tree together with the number of records it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MerkleTree {
    root: MerkleNode,
    leaf_count: usize,
}

impl MerkleTree {
    pub fn build<S: AsRef<str>>(records: &[S]) -> Result<Self> {
        Ok(Self {
            root: build_tree(records)?,
            leaf_count: records.len(),
        })
    }

    pub fn root(&self) -> &MerkleNode {
        &self.root
    }

    pub fn root_hash(&self) -> &str {
        self.root.hash()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of levels above the leaves; 0 for a single record.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = &self.root;
        while let Some(left) = node.left() {
            height += 1;
            node = left;
        }
        height
    }

    pub fn traverse(&self) -> Traverse<'_> {
        traverse(&self.root)
    }

    /// One line per node in pre-order, indented by depth.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, hash) in self.traverse() {
            writeln!(f, "{:indent$}{}", "", hash, indent = depth * RENDER_INDENT)?;
        }
        Ok(())
    }
}

/// Root hash of the tree over `records`.
pub fn merkle_root<S: AsRef<str>>(records: &[S]) -> Result<String> {
    build_tree(records).map(|root| root.hash)
}
