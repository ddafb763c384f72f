//! Leaf and inner node hashing.
//!
//! Inner nodes hash the two children sorted ascending by their bytes, so a
//! proof never needs to record which side a sibling sits on.

use std::fmt;
use std::str::FromStr;

use digest::consts::U32;
use digest::{Digest, OutputSizeUser};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MerkleError;

pub const HASH_SIZE: usize = 32;

/// Hash function used when the caller does not pick one.
pub type DefaultHasher = sha3::Keccak256;

/// A 32-byte digest. Ordering is byte-wise, which coincides with the
/// ordering of the lowercase hex text form.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses a 32-byte hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, MerkleError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| MerkleError::InvalidHash(format!("{s}: {e}")))?;
        Ok(Hash(bytes))
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct HashVisitor;

impl<'de> Visitor<'de> for HashVisitor {
    type Value = Hash;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a hex-encoded 32-byte hash")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Hash::from_hex(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(HashVisitor)
    }
}

impl JsonSchema for Hash {
    fn schema_name() -> String {
        "Hash".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// A cryptographic hash with a 32-byte output.
///
/// Implemented for every `digest::Digest` of that size, so `sha3::Keccak256`,
/// `sha2::Sha256` and `sha3::Sha3_256` all plug in directly. Builder and
/// verifier must agree on the choice.
pub trait MerkleHasher {
    fn hash_parts(parts: &[&[u8]]) -> Hash;
}

impl<D> MerkleHasher for D
where
    D: Digest + OutputSizeUser<OutputSize = U32>,
{
    fn hash_parts(parts: &[&[u8]]) -> Hash {
        let mut hasher = <D as Digest>::new();
        for part in parts {
            Digest::update(&mut hasher, part);
        }
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&hasher.finalize());
        Hash(out)
    }
}

/// H(content)
pub fn leaf_hash<H: MerkleHasher>(content: &[u8]) -> Hash {
    H::hash_parts(&[content])
}

/// H(min(a, b) || max(a, b))
pub fn pair_hash<H: MerkleHasher>(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    H::hash_parts(&[lo.as_ref(), hi.as_ref()])
}
