use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The caller handed in something no result can be built from,
    /// e.g. an empty record list for a Merkle tree.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
