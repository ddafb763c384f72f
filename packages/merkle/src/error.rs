use thiserror::Error;

use crate::hash::Hash;

#[derive(Error, Debug, PartialEq)]
pub enum MerkleError {
    #[error("Cannot build a tree without leaves")]
    EmptyTree,
    #[error("Leaf {0} not found in tree")]
    LeafNotFound(Hash),
    #[error("Leaf index {index} out of range for {count} leaves")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("Tree has not been built yet")]
    TreeNotBuilt,
    #[error("Invalid hash {0}")]
    InvalidHash(String),
    #[error("Invalid proof: expected root {expected}, computed {computed}")]
    ProofMismatch { expected: Hash, computed: Hash },
    #[error("Expected no more than {max} siblings, got {got}")]
    ProofTooLong { max: usize, got: usize },
    #[error("Failed to serialize leaf content: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MerkleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MerkleError>;
