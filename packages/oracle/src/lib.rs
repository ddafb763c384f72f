//! Seams around the Merkle core: where audits come from, where their
//! commitments are stored, and how roots reach and are checked by a
//! verification contract.

mod chain;
mod config;
mod error;
mod model;
mod service;
mod store;

pub use self::chain::{ChainClient, LocalOracle, StoredRoot, TxReceipt, VerificationOracle};
pub use self::config::{
    env_key, NetworkConfig, OracleConfig, CONTRACT_ENV_PREFIX, LEGACY_CONTRACT_ENV_PREFIX,
    RPC_URL_ENV_SUFFIX,
};
pub use self::error::{OracleError, Result};
pub use self::model::{AuditRecord, AuditStatus, Fix, Severity, Vulnerability};
pub use self::service::ProofService;
pub use self::store::{AuditStore, MemoryAuditStore, StoredMerkleData};
