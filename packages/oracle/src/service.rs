use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use audit_merkle::{build_audit_merkle_tree_with, AuditMerkleTree, DefaultHasher, Hash, MerkleHasher};
use log::{info, warn};

use crate::chain::{ChainClient, TxReceipt, VerificationOracle};
use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::store::{AuditStore, StoredMerkleData};

/// Generates, persists, publishes and checks audit commitments.
pub struct ProofService<S, C, H = DefaultHasher> {
    store: S,
    chain: C,
    config: OracleConfig,
    hasher: PhantomData<H>,
}

impl<S: AuditStore, C> ProofService<S, C> {
    pub fn new(store: S, chain: C, config: OracleConfig) -> Self {
        Self::with_hasher(store, chain, config)
    }
}

impl<S: AuditStore, C, H: MerkleHasher> ProofService<S, C, H> {
    pub fn with_hasher(store: S, chain: C, config: OracleConfig) -> Self {
        ProofService {
            store,
            chain,
            config,
            hasher: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Builds the commitment of an audit and stores it, replacing any
    /// earlier root and proofs.
    pub fn generate(&mut self, audit_id: &str) -> Result<AuditMerkleTree> {
        if audit_id.is_empty() {
            return Err(OracleError::MissingField("audit_id"));
        }
        let audit = self
            .store
            .audit(audit_id)?
            .ok_or_else(|| OracleError::AuditNotFound(audit_id.to_string()))?;

        let tree = build_audit_merkle_tree_with::<H>(&audit.merkle_input()?)?;
        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.store.upsert_merkle_data(
            audit_id,
            StoredMerkleData {
                tree: tree.clone(),
                generated_at,
            },
        )?;

        info!(
            "generated merkle root {} for audit {audit_id} ({} leaves)",
            tree.root,
            tree.leaves.len()
        );
        Ok(tree)
    }

    pub fn merkle_data(&self, audit_id: &str) -> Result<StoredMerkleData> {
        self.store
            .merkle_data(audit_id)?
            .ok_or_else(|| OracleError::MerkleDataNotGenerated(audit_id.to_string()))
    }

    /// Checks a leaf against the stored root using the stored proof,
    /// without contacting any chain.
    pub fn verify_local(&self, audit_id: &str, leaf_hash: &Hash) -> Result<bool> {
        Ok(self.merkle_data(audit_id)?.tree.verify_leaf::<H>(leaf_hash))
    }
}

impl<S: AuditStore, C: ChainClient, H: MerkleHasher> ProofService<S, C, H> {
    /// Submits the stored root of an audit to the contract on `network`.
    pub fn publish(&mut self, audit_id: &str, auditor: &str, network: &str) -> Result<TxReceipt> {
        if auditor.is_empty() {
            return Err(OracleError::MissingField("auditor"));
        }
        let data = self.merkle_data(audit_id)?;
        let network = self.config.network(network).map_err(|e| {
            warn!("cannot publish audit {audit_id}: {e}");
            e
        })?;
        network.rpc_url()?;

        let receipt = self
            .chain
            .submit_root(network, auditor, audit_id, &data.root())?;
        info!(
            "published root {} for audit {audit_id} on {} in tx {}",
            receipt.merkle_root, network.name, receipt.transaction_hash
        );
        Ok(receipt)
    }
}

impl<S: AuditStore, C: VerificationOracle, H: MerkleHasher> ProofService<S, C, H> {
    /// Asks the contract on `network` whether `leaf_hash` with `proof`
    /// belongs to the root committed for the audit.
    pub fn verify(
        &self,
        audit_id: &str,
        leaf_hash: &Hash,
        proof: &[Hash],
        network: &str,
    ) -> Result<bool> {
        if audit_id.is_empty() {
            return Err(OracleError::MissingField("audit_id"));
        }
        let network = self.config.network(network)?;
        self.chain.verify_leaf(network, audit_id, leaf_hash, proof)
    }
}
