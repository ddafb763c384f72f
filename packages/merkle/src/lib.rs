//! Merkle commitments over audit artifacts.
//!
//! Leaves are hashed content items, inner nodes hash their two children in
//! sorted order, and an unpaired node on an odd level is carried up
//! unchanged. Proofs are plain bottom-up sibling lists.

mod audit;
mod error;
mod hash;
mod proof;
mod tree;

pub use self::audit::{
    build_audit_merkle_tree, build_audit_merkle_tree_with, canonical_json, AuditData,
    AuditMerkleTree, LeafKind, MerkleLeaf,
};
pub use self::error::{MerkleError, Result};
pub use self::hash::{leaf_hash, pair_hash, DefaultHasher, Hash, MerkleHasher, HASH_SIZE};
pub use self::proof::{compute_root, verify_proof, Proof, MAX_SIBLINGS};
pub use self::tree::MerkleTreeBuilder;

pub use sha2::Sha256;
pub use sha3::Keccak256;
