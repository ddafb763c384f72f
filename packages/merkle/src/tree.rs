use std::marker::PhantomData;

use log::debug;

use crate::error::{MerkleError, Result};
use crate::hash::{leaf_hash, pair_hash, DefaultHasher, Hash, MerkleHasher};

/// Builds a binary Merkle tree over an ordered list of content items.
///
/// Adjacent hashes are combined with [`pair_hash`], which sorts the pair
/// first. When a level has an odd number of nodes the last one is carried
/// up to the next level unchanged; it is never duplicated.
///
/// Usage: call [`add_leaf`](Self::add_leaf) for every item, then
/// [`build_tree`](Self::build_tree), then [`get_proof`](Self::get_proof)
/// for any leaf. `build_tree` is idempotent; adding a leaf afterwards
/// discards the built levels, so proofs are only ever served for the
/// current leaf set.
#[derive(Debug, Clone)]
pub struct MerkleTreeBuilder<H = DefaultHasher> {
    leaves: Vec<Hash>,
    levels: Vec<Vec<Hash>>,
    hasher: PhantomData<H>,
}

impl MerkleTreeBuilder {
    pub fn new() -> Self {
        Self::with_hasher()
    }
}

impl Default for MerkleTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> MerkleTreeBuilder<H> {
    /// Creates a builder hashing with `H` instead of the default Keccak-256.
    pub fn with_hasher() -> Self {
        MerkleTreeBuilder {
            leaves: vec![],
            levels: vec![],
            hasher: PhantomData,
        }
    }

    /// Hashes `content` and appends it as the next leaf.
    pub fn add_leaf(&mut self, content: impl AsRef<[u8]>) -> Hash {
        let hash = leaf_hash::<H>(content.as_ref());
        self.leaves.push(hash);
        self.levels.clear();
        hash
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaves(&self) -> &[Hash] {
        &self.leaves
    }

    pub fn is_built(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Folds the leaves into a root, keeping every level for proof lookup.
    pub fn build_tree(&mut self) -> Result<Hash> {
        if self.is_built() {
            return self.root();
        }
        if self.leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let mut levels = vec![self.leaves.clone()];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => pair_hash::<H>(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two items"),
                })
                .collect();
            levels.push(next);
        }
        self.levels = levels;

        let root = self.root()?;
        debug!(
            "built merkle tree with {} leaves and {} levels, root {root}",
            self.leaves.len(),
            self.levels.len()
        );
        Ok(root)
    }

    pub fn root(&self) -> Result<Hash> {
        self.levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .ok_or(MerkleError::TreeNotBuilt)
    }

    /// All levels, leaves first and the root last. Empty until built.
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    /// Sibling path of the first leaf equal to `leaf_hash`, bottom-up,
    /// excluding the root.
    pub fn get_proof(&self, leaf_hash: &Hash) -> Result<Vec<Hash>> {
        let leaves = self.levels.first().ok_or(MerkleError::TreeNotBuilt)?;
        let index = leaves
            .iter()
            .position(|leaf| leaf == leaf_hash)
            .ok_or(MerkleError::LeafNotFound(*leaf_hash))?;
        self.proof_for_index(index)
    }

    /// Sibling path of the leaf at position `index`.
    pub fn proof_for_index(&self, mut index: usize) -> Result<Vec<Hash>> {
        let (_root, below_root) = self.levels.split_last().ok_or(MerkleError::TreeNotBuilt)?;
        if index >= self.leaves.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                count: self.leaves.len(),
            });
        }

        let mut proof = Vec::with_capacity(below_root.len());
        for level in below_root {
            if let Some(sibling) = level.get(index ^ 1) {
                proof.push(*sibling);
            }
            index /= 2;
        }
        Ok(proof)
    }
}
