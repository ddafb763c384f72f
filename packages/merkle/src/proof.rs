use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, Result};
use crate::hash::{pair_hash, DefaultHasher, Hash, MerkleHasher};

// A tree this deep would hold 2^64 leaves; anything longer is malformed.
pub const MAX_SIBLINGS: usize = 64;

/// An inclusion proof for a single leaf.
///
/// Siblings are listed from the leaf level upwards and exclude the root.
/// Since inner nodes hash a sorted pair, no left/right flags are needed:
/// replaying the siblings in order is enough to rebuild the root.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Proof {
    /// Hash of the committed content.
    pub leaf_hash: Hash,
    /// Hashes from the leaf's sibling up to a child of the root.
    pub siblings: Vec<Hash>,
}

impl Proof {
    pub fn new(leaf_hash: Hash, siblings: Vec<Hash>) -> Self {
        Proof {
            leaf_hash,
            siblings,
        }
    }

    /// Folds the leaf hash through every sibling.
    pub fn compute_root<H: MerkleHasher>(&self) -> Hash {
        compute_root::<H>(&self.leaf_hash, &self.siblings)
    }

    /// Verifies that the proof rebuilds `root` under the default hasher.
    pub fn verify(&self, root: &Hash) -> Result<()> {
        self.verify_with::<DefaultHasher>(root)
    }

    pub fn verify_with<H: MerkleHasher>(&self, root: &Hash) -> Result<()> {
        self.validate_basic()?;
        let computed = self.compute_root::<H>();
        if computed != *root {
            return Err(MerkleError::ProofMismatch {
                expected: *root,
                computed,
            });
        }
        Ok(())
    }

    pub fn validate_basic(&self) -> Result<()> {
        if self.siblings.len() > MAX_SIBLINGS {
            return Err(MerkleError::ProofTooLong {
                max: MAX_SIBLINGS,
                got: self.siblings.len(),
            });
        }
        Ok(())
    }
}

/// acc = leaf; for each sibling: acc = H(sorted(acc, sibling))
pub fn compute_root<H: MerkleHasher>(leaf_hash: &Hash, siblings: &[Hash]) -> Hash {
    siblings
        .iter()
        .fold(*leaf_hash, |acc, sibling| pair_hash::<H>(&acc, sibling))
}

/// Returns whether `siblings` fold `leaf_hash` into `root`.
pub fn verify_proof<H: MerkleHasher>(root: &Hash, leaf_hash: &Hash, siblings: &[Hash]) -> bool {
    siblings.len() <= MAX_SIBLINGS && compute_root::<H>(leaf_hash, siblings) == *root
}
