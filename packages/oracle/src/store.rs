use std::collections::BTreeMap;

use audit_merkle::{AuditMerkleTree, Hash, Proof};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AuditRecord;

/// The Merkle commitment persisted next to an audit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct StoredMerkleData {
    pub tree: AuditMerkleTree,
    /// Seconds since the Unix epoch.
    pub generated_at: u64,
}

impl StoredMerkleData {
    pub fn root(&self) -> Hash {
        self.tree.root
    }

    pub fn proof(&self, leaf_hash: &Hash) -> Option<Proof> {
        self.tree.proof(leaf_hash)
    }
}

/// Document store holding audits and their Merkle data.
///
/// Writing Merkle data replaces whatever was stored for the audit before;
/// a regenerated root must never sit next to proofs of an older one.
pub trait AuditStore {
    fn audit(&self, audit_id: &str) -> Result<Option<AuditRecord>>;

    fn upsert_merkle_data(&mut self, audit_id: &str, data: StoredMerkleData) -> Result<()>;

    fn merkle_data(&self, audit_id: &str) -> Result<Option<StoredMerkleData>>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAuditStore {
    audits: BTreeMap<String, AuditRecord>,
    merkle: BTreeMap<String, StoredMerkleData>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_audit(&mut self, audit: AuditRecord) {
        self.audits.insert(audit.id.clone(), audit);
    }
}

impl AuditStore for MemoryAuditStore {
    fn audit(&self, audit_id: &str) -> Result<Option<AuditRecord>> {
        Ok(self.audits.get(audit_id).cloned())
    }

    fn upsert_merkle_data(&mut self, audit_id: &str, data: StoredMerkleData) -> Result<()> {
        self.merkle.insert(audit_id.to_string(), data);
        Ok(())
    }

    fn merkle_data(&self, audit_id: &str) -> Result<Option<StoredMerkleData>> {
        Ok(self.merkle.get(audit_id).cloned())
    }
}
