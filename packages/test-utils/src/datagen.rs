use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{json, Value};

pub const SEVERITIES: [&str; 4] = ["critical", "high", "medium", "low"];

const TITLES: [&str; 6] = [
    "Reentrancy in withdraw",
    "Unchecked external call",
    "Integer overflow",
    "Floating pragma",
    "Missing access control",
    "Timestamp dependence",
];

/// Seeded RNG so failures reproduce.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generate random bytes of specified length using the provided RNG
pub fn gen_random_bytes<R: RngCore>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

/// Random hex string of `len` bytes, useful as opaque leaf content.
pub fn gen_random_content<R: RngCore>(rng: &mut R, len: usize) -> String {
    hex::encode(gen_random_bytes(rng, len))
}

/// A fake IPFS content identifier.
pub fn gen_random_cid<R: RngCore>(rng: &mut R) -> String {
    format!("Qm{}", gen_random_content(rng, 22))
}

/// A vulnerability record in the shape the scanner reports.
pub fn gen_random_vulnerability<R: RngCore>(rng: &mut R, id: u32) -> Value {
    let severity = SEVERITIES.choose(rng).copied().unwrap_or("low");
    let title = TITLES.choose(rng).copied().unwrap_or("Unknown issue");
    json!({
        "id": id,
        "severity": severity,
        "title": title,
        "line": rng.gen_range(1..500u32),
        "description": format!("{title} detected"),
        "impact": gen_random_content(rng, 8),
        "recommendation": format!("Review {title}"),
    })
}

pub fn gen_random_vulnerabilities<R: RngCore>(rng: &mut R, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| gen_random_vulnerability(rng, i as u32 + 1))
        .collect()
}

/// A fix record wrapping patched source code.
pub fn gen_random_fix<R: RngCore>(rng: &mut R) -> Value {
    json!({ "code": format!("// patched\n{}", gen_random_content(rng, 32)) })
}
