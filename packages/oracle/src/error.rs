use audit_merkle::MerkleError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum OracleError {
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error("Audit {0} not found")]
    AuditNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Contract not deployed on network {0}")]
    NetworkNotConfigured(String),

    #[error("RPC URL not configured for network {0}")]
    MissingRpcUrl(String),

    #[error("Invalid contract address {address} for network {network}")]
    InvalidContractAddress { network: String, address: String },

    #[error("Merkle data has not been generated for audit {0}")]
    MerkleDataNotGenerated(String),

    #[error("Chain call failed: {0}")]
    Chain(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for OracleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;
