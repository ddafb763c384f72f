use std::collections::BTreeMap;
use std::marker::PhantomData;

use audit_merkle::{verify_proof, DefaultHasher, Hash, MerkleHasher};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{env_key, NetworkConfig};
use crate::error::Result;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct TxReceipt {
    pub transaction_hash: Hash,
    pub merkle_root: Hash,
    pub contract_address: String,
}

/// Submits roots to the verification contract of a network.
pub trait ChainClient {
    fn submit_root(
        &mut self,
        network: &NetworkConfig,
        auditor: &str,
        audit_id: &str,
        root: &Hash,
    ) -> Result<TxReceipt>;
}

/// Answers whether a leaf and its proof fold into the root stored for an
/// audit. Implementations must use the same sorted-pair folding as
/// [`audit_merkle::compute_root`].
pub trait VerificationOracle {
    fn verify_leaf(
        &self,
        network: &NetworkConfig,
        audit_id: &str,
        leaf_hash: &Hash,
        proof: &[Hash],
    ) -> Result<bool>;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct StoredRoot {
    pub auditor: String,
    pub root: Hash,
}

/// In-process stand-in for the on-chain contract.
///
/// Roots are kept per network and audit id, and a later submission for the
/// same audit replaces the earlier root.
#[derive(Debug, Clone)]
pub struct LocalOracle<H = DefaultHasher> {
    roots: BTreeMap<(String, String), StoredRoot>,
    submissions: u64,
    hasher: PhantomData<H>,
}

impl LocalOracle {
    pub fn new() -> Self {
        Self::with_hasher()
    }
}

impl Default for LocalOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> LocalOracle<H> {
    pub fn with_hasher() -> Self {
        LocalOracle {
            roots: BTreeMap::new(),
            submissions: 0,
            hasher: PhantomData,
        }
    }

    pub fn stored_root(&self, network: &str, audit_id: &str) -> Option<&StoredRoot> {
        self.roots.get(&(env_key(network), audit_id.to_string()))
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl<H: MerkleHasher> ChainClient for LocalOracle<H> {
    fn submit_root(
        &mut self,
        network: &NetworkConfig,
        auditor: &str,
        audit_id: &str,
        root: &Hash,
    ) -> Result<TxReceipt> {
        self.submissions += 1;
        let transaction_hash = H::hash_parts(&[
            network.contract_address.as_bytes(),
            audit_id.as_bytes(),
            root.as_ref(),
            &self.submissions.to_be_bytes(),
        ]);
        self.roots.insert(
            (env_key(&network.name), audit_id.to_string()),
            StoredRoot {
                auditor: auditor.to_string(),
                root: *root,
            },
        );
        debug!("stored root {root} for audit {audit_id} on {}", network.name);

        Ok(TxReceipt {
            transaction_hash,
            merkle_root: *root,
            contract_address: network.contract_address.clone(),
        })
    }
}

impl<H: MerkleHasher> VerificationOracle for LocalOracle<H> {
    fn verify_leaf(
        &self,
        network: &NetworkConfig,
        audit_id: &str,
        leaf_hash: &Hash,
        proof: &[Hash],
    ) -> Result<bool> {
        Ok(self
            .stored_root(&network.name, audit_id)
            .is_some_and(|stored| verify_proof::<H>(&stored.root, leaf_hash, proof)))
    }
}
