use audit_merkle::{
    build_audit_merkle_tree, compute_root, leaf_hash, verify_proof, AuditData, DefaultHasher,
    Hash, MerkleError, MerkleTreeBuilder, Proof,
};
use audit_test_utils::{
    gen_random_cid, gen_random_content, gen_random_fix, gen_random_vulnerabilities, seeded_rng,
};
use assert_matches::assert_matches;
use rand::Rng;

fn random_audit(seed: u64, vulnerabilities: usize, fixes: usize) -> AuditData {
    let mut rng = seeded_rng(seed);
    AuditData {
        vulnerabilities: gen_random_vulnerabilities(&mut rng, vulnerabilities),
        fixes: (0..fixes).map(|_| gen_random_fix(&mut rng)).collect(),
        model_output: gen_random_content(&mut rng, 64),
        report_reference: gen_random_cid(&mut rng),
    }
}

fn root_of(contents: &[String]) -> Hash {
    let mut builder = MerkleTreeBuilder::new();
    for content in contents {
        builder.add_leaf(content);
    }
    builder.build_tree().unwrap()
}

#[test]
fn deterministic_root_and_proofs() {
    for seed in 0..10 {
        let audit = random_audit(seed, seed as usize, 1);
        let first = build_audit_merkle_tree(&audit).unwrap();
        let second = build_audit_merkle_tree(&audit.clone()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn permuting_leaves_changes_root() {
    let mut rng = seeded_rng(42);
    let contents: Vec<String> = (0..8).map(|_| gen_random_content(&mut rng, 16)).collect();
    let root = root_of(&contents);

    let mut rotated = contents.clone();
    rotated.rotate_left(1);
    assert_ne!(root_of(&rotated), root);

    // Swapping across a pair boundary changes the root. Swapping within a
    // pair does not, since each pair is sorted before hashing.
    let mut swapped = contents.clone();
    swapped.swap(1, 2);
    assert_ne!(root_of(&swapped), root);

    let mut within_pair = contents.clone();
    within_pair.swap(0, 1);
    assert_eq!(root_of(&within_pair), root);

    // Swapping whole pairs one level up collides for the same reason.
    let mut pair_swapped = contents.clone();
    pair_swapped.swap(0, 2);
    pair_swapped.swap(1, 3);
    assert_eq!(root_of(&pair_swapped), root);
}

#[test]
fn single_leaf_order_is_irrelevant() {
    let contents = vec!["only".to_string()];
    assert_eq!(root_of(&contents), leaf_hash::<DefaultHasher>(b"only"));
}

#[test]
fn every_leaf_round_trips() {
    for seed in 0..20u64 {
        let mut rng = seeded_rng(seed);
        let audit = random_audit(seed, rng.gen_range(0..40), rng.gen_range(0..3));
        let tree = build_audit_merkle_tree(&audit).unwrap();
        let leaf_count = tree.leaves.len();
        let max_len = leaf_count.next_power_of_two().trailing_zeros() as usize;

        for leaf in &tree.leaves {
            let siblings = &tree.proofs[&leaf.hash];
            assert!(siblings.len() <= max_len);
            assert_eq!(compute_root::<DefaultHasher>(&leaf.hash, siblings), tree.root);
            assert!(verify_proof::<DefaultHasher>(&tree.root, &leaf.hash, siblings));
        }
    }
}

#[test]
fn tampering_changes_root_and_breaks_old_proofs() {
    let audit = random_audit(3, 6, 1);
    let original = build_audit_merkle_tree(&audit).unwrap();

    let mut tampered_audit = audit.clone();
    let mut report = tampered_audit.report_reference.into_bytes();
    report[2] = if report[2] == b'a' { b'b' } else { b'a' };
    tampered_audit.report_reference = String::from_utf8(report).unwrap();
    let tampered = build_audit_merkle_tree(&tampered_audit).unwrap();

    assert_ne!(original.root, tampered.root);
    for leaf in &original.leaves {
        let proof = original.proof(&leaf.hash).unwrap();
        assert_matches!(
            proof.verify(&tampered.root),
            Err(MerkleError::ProofMismatch { .. })
        );
    }
}

#[test]
fn three_leaf_shape() {
    let mut builder = MerkleTreeBuilder::new();
    let l0 = builder.add_leaf("leaf0");
    let l1 = builder.add_leaf("leaf1");
    let l2 = builder.add_leaf("leaf2");
    let root = builder.build_tree().unwrap();

    let sorted_concat = |a: &Hash, b: &Hash| {
        let (lo, hi) = if a.to_hex() <= b.to_hex() { (a, b) } else { (b, a) };
        let mut bytes = lo.as_bytes().to_vec();
        bytes.extend_from_slice(hi.as_bytes());
        leaf_hash::<DefaultHasher>(&bytes)
    };
    assert_eq!(root, sorted_concat(&sorted_concat(&l0, &l1), &l2));
}

#[test]
fn foreign_leaf_is_rejected() {
    let mut builder = MerkleTreeBuilder::new();
    builder.add_leaf("a");
    builder.add_leaf("b");
    builder.build_tree().unwrap();

    let mut other = MerkleTreeBuilder::new();
    let foreign = other.add_leaf("c");
    assert_eq!(
        builder.get_proof(&foreign),
        Err(MerkleError::LeafNotFound(foreign))
    );
}

#[test]
fn proof_from_one_audit_fails_on_another() {
    let a = build_audit_merkle_tree(&random_audit(10, 4, 1)).unwrap();
    let b = build_audit_merkle_tree(&random_audit(11, 4, 1)).unwrap();
    let leaf = &a.leaves[0];
    let proof = Proof::new(leaf.hash, a.proofs[&leaf.hash].clone());
    assert!(proof.verify(&a.root).is_ok());
    assert!(proof.verify(&b.root).is_err());
}
