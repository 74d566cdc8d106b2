//! Golden test vectors for the hash digest.
//!
//! Every validator must derive identical digests from identical hash lists,
//! since vote records compare them across nodes.

use paracross_core::{digest, Hash};

/// A golden digest vector.
#[derive(Debug, Clone)]
pub struct DigestVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Inputs; each tag is hashed to produce one element.
    pub tags: &'static [&'static str],
    /// Expected digest (hex).
    pub expected_digest: &'static str,
}

impl DigestVector {
    pub fn hashes(&self) -> Vec<Hash> {
        self.tags.iter().map(|t| Hash::hash(t.as_bytes())).collect()
    }
}

/// Get all golden digest vectors.
pub fn all_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "empty sequence",
            tags: &[],
            expected_digest: "0000000000000000000000000000000000000000000000000000000000000000",
        },
        DigestVector {
            name: "single transaction",
            tags: &["tx-0"],
            expected_digest: "34b9acc57d203814e1b91baf77bf1b80ee4770754137adaa30a3f4f86fcec737",
        },
        DigestVector {
            name: "three transactions",
            tags: &["tx-0", "tx-1", "tx-2"],
            expected_digest: "06d27c61154eec2cdf0d7c332fd1f062c57e0150ebb952f0d6876f1f0f4fe653",
        },
        DigestVector {
            name: "three transactions reversed",
            tags: &["tx-2", "tx-1", "tx-0"],
            expected_digest: "b6909a497ecb302d4a5b49009e19357c0eb17c01702d4e8e2f8e6f8594f0a4d6",
        },
    ]
}

/// Compute every vector and compare against its expectation.
///
/// Returns `(name, matches, computed_hex)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = digest(&v.hashes());
            let matches = hex::decode(v.expected_digest)
                .is_ok_and(|expected| expected == computed.as_bytes());
            (v.name.to_string(), matches, computed.to_hex())
        })
        .collect()
}

/// Computed vectors as JSON, for cross-implementation comparison.
pub fn vectors_json() -> serde_json::Result<String> {
    let computed: Vec<serde_json::Value> = all_vectors()
        .iter()
        .map(|v| {
            serde_json::json!({
                "name": v.name,
                "inputs": v.hashes().iter().map(Hash::to_hex).collect::<Vec<_>>(),
                "digest": digest(&v.hashes()).to_hex(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {hex}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        assert_eq!(verify_all_vectors(), verify_all_vectors());
    }

    #[test]
    fn test_reversal_changes_digest() {
        let results = verify_all_vectors();
        assert_ne!(results[2].2, results[3].2);
    }

    #[test]
    fn test_json_export_parses() {
        let json = vectors_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(all_vectors().len()));
    }
}
