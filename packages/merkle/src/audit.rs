use std::collections::BTreeMap;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hash::{DefaultHasher, Hash, MerkleHasher};
use crate::proof::{verify_proof, Proof};
use crate::tree::MerkleTreeBuilder;

/// What a leaf commits to. Informational only; it does not enter the hash.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    Vulnerability,
    Fix,
    ModelOutput,
    ReportReference,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct MerkleLeaf {
    pub kind: LeafKind,
    /// Exact bytes that were hashed.
    pub content: String,
    pub hash: Hash,
}

/// Inputs committed for a single audit.
///
/// Records are kept as JSON values and hashed through [`canonical_json`],
/// so logically equal records always produce the same leaf.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct AuditData {
    pub vulnerabilities: Vec<serde_json::Value>,
    pub fixes: Vec<serde_json::Value>,
    pub model_output: String,
    /// Content identifier of the published report.
    pub report_reference: String,
}

/// Output of [`build_audit_merkle_tree`]: everything needed to check a single
/// leaf later without rebuilding the tree.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct AuditMerkleTree {
    pub leaves: Vec<MerkleLeaf>,
    pub root: Hash,
    /// Proof per leaf hash. Leaves with identical content share one entry.
    pub proofs: BTreeMap<Hash, Vec<Hash>>,
}

impl AuditMerkleTree {
    pub fn proof(&self, leaf_hash: &Hash) -> Option<Proof> {
        self.proofs
            .get(leaf_hash)
            .map(|siblings| Proof::new(*leaf_hash, siblings.clone()))
    }

    pub fn leaves_of_kind(&self, kind: LeafKind) -> impl Iterator<Item = &MerkleLeaf> {
        self.leaves.iter().filter(move |leaf| leaf.kind == kind)
    }

    /// Checks a stored leaf against the stored root with the local folding.
    pub fn verify_leaf<H: MerkleHasher>(&self, leaf_hash: &Hash) -> bool {
        self.proofs
            .get(leaf_hash)
            .is_some_and(|siblings| verify_proof::<H>(&self.root, leaf_hash, siblings))
    }
}

/// Serializes `value` as compact JSON with object keys in lexicographic
/// order, independent of field declaration or insertion order.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    // `serde_json::Value` keeps objects in a BTreeMap, which sorts keys.
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&value)?)
}

/// Commits an audit with the default Keccak-256 hasher.
pub fn build_audit_merkle_tree(audit: &AuditData) -> Result<AuditMerkleTree> {
    build_audit_merkle_tree_with::<DefaultHasher>(audit)
}

/// Commits an audit. Leaf order is fixed: every vulnerability in input
/// order, every fix in input order, the model output, then the report
/// reference. Changing the order changes the root.
pub fn build_audit_merkle_tree_with<H: MerkleHasher>(audit: &AuditData) -> Result<AuditMerkleTree> {
    let mut builder = MerkleTreeBuilder::<H>::with_hasher();
    let mut leaves = Vec::with_capacity(audit.vulnerabilities.len() + audit.fixes.len() + 2);

    let mut push = |kind: LeafKind, content: String| {
        let hash = builder.add_leaf(&content);
        leaves.push(MerkleLeaf {
            kind,
            content,
            hash,
        });
    };

    for vulnerability in &audit.vulnerabilities {
        push(LeafKind::Vulnerability, canonical_json(vulnerability)?);
    }
    for fix in &audit.fixes {
        push(LeafKind::Fix, canonical_json(fix)?);
    }
    push(LeafKind::ModelOutput, audit.model_output.clone());
    push(LeafKind::ReportReference, audit.report_reference.clone());

    let root = builder.build_tree()?;

    let mut proofs = BTreeMap::new();
    for leaf in &leaves {
        if !proofs.contains_key(&leaf.hash) {
            proofs.insert(leaf.hash, builder.get_proof(&leaf.hash)?);
        }
    }

    debug!(
        "committed audit with {} vulnerabilities and {} fixes under root {root}",
        audit.vulnerabilities.len(),
        audit.fixes.len()
    );

    Ok(AuditMerkleTree {
        leaves,
        root,
        proofs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::leaf_hash;
    use serde_json::json;

    fn sample() -> AuditData {
        AuditData {
            vulnerabilities: vec![
                json!({"sev": "high", "title": "Reentrancy"}),
                json!({"sev": "low", "title": "Floating pragma"}),
            ],
            fixes: vec![json!({"code": "pragma solidity 0.8.20;"})],
            model_output: "{\"riskScore\":42}".to_string(),
            report_reference: "QmReportCid".to_string(),
        }
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        #[derive(Serialize)]
        struct Record {
            zeta: u32,
            alpha: &'static str,
        }
        let text = canonical_json(&Record {
            zeta: 1,
            alpha: "a",
        })
        .unwrap();
        assert_eq!(text, r#"{"alpha":"a","zeta":1}"#);

        let a: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":{"d":2,"c":3}}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"a":{"c":3,"d":2},"b":1}"#).unwrap();
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }

    #[test]
    fn test_leaf_order_and_kinds() {
        let tree = build_audit_merkle_tree(&sample()).unwrap();
        let kinds: Vec<LeafKind> = tree.leaves.iter().map(|leaf| leaf.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LeafKind::Vulnerability,
                LeafKind::Vulnerability,
                LeafKind::Fix,
                LeafKind::ModelOutput,
                LeafKind::ReportReference,
            ]
        );
        assert_eq!(tree.leaves[0].content, r#"{"sev":"high","title":"Reentrancy"}"#);
        assert_eq!(tree.leaves[4].content, "QmReportCid");
        for leaf in &tree.leaves {
            assert_eq!(leaf.hash, leaf_hash::<DefaultHasher>(leaf.content.as_bytes()));
        }
        assert_eq!(tree.leaves_of_kind(LeafKind::Vulnerability).count(), 2);
    }

    #[test]
    fn test_five_leaf_scenario() {
        let audit = sample();
        let tree = build_audit_merkle_tree(&audit).unwrap();

        let mut builder = MerkleTreeBuilder::new();
        for leaf in &tree.leaves {
            builder.add_leaf(&leaf.content);
        }
        builder.build_tree().unwrap();
        let sizes: Vec<usize> = builder.levels().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 3, 2, 1]);

        // The report reference is unpaired on the two lowest levels and only
        // meets a sibling one level below the root.
        let report = &tree.leaves[4];
        assert_eq!(builder.levels()[1][2], report.hash);
        assert_eq!(builder.levels()[2][1], report.hash);
        assert_eq!(tree.proofs[&report.hash], vec![builder.levels()[2][0]]);
        for leaf in &tree.leaves[..4] {
            assert_eq!(tree.proofs[&leaf.hash].len(), 3);
        }
    }

    #[test]
    fn test_every_leaf_verifies() {
        let tree = build_audit_merkle_tree(&sample()).unwrap();
        for leaf in &tree.leaves {
            assert!(tree.verify_leaf::<DefaultHasher>(&leaf.hash));
            assert!(tree.proof(&leaf.hash).unwrap().verify(&tree.root).is_ok());
        }
        assert!(!tree.verify_leaf::<DefaultHasher>(&leaf_hash::<DefaultHasher>(b"foreign")));
    }

    #[test]
    fn test_empty_groups_still_commit() {
        // Model output and report reference always contribute a leaf.
        let tree = build_audit_merkle_tree(&AuditData::default()).unwrap();
        assert_eq!(tree.leaves.len(), 2);
        assert_eq!(tree.leaves[0].kind, LeafKind::ModelOutput);
        assert_eq!(tree.leaves[0].hash, tree.leaves[1].hash);
        assert_eq!(tree.proofs.len(), 1);
        assert!(tree.verify_leaf::<DefaultHasher>(&tree.leaves[0].hash));
    }

    #[test]
    fn test_json_output_shape() {
        let tree = build_audit_merkle_tree(&sample()).unwrap();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["leaves"][3]["kind"], "model_output");
        assert_eq!(value["leaves"][4]["kind"], "report_reference");
        assert_eq!(value["root"], tree.root.to_hex());
        let report_hash = tree.leaves[4].hash.to_hex();
        assert_eq!(value["proofs"][&report_hash].as_array().unwrap().len(), 1);

        let back: AuditMerkleTree = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }
}
