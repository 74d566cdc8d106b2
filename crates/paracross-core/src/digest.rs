//! Order-sensitive digest over a sequence of hashes.
//!
//! Validators compare digests instead of shipping full transaction hash
//! lists once the vote encoding fork is active.

use crate::crypto::Hash;

/// Domain prefix mixed into every non-empty digest.
const DIGEST_DOMAIN: &[u8] = b"paracross-tx-hashes-v0:";

/// Digest of the empty sequence.
pub const EMPTY_DIGEST: Hash = Hash::ZERO;

/// Compute the digest of an ordered hash sequence.
///
/// Blake3 over the domain prefix, the sequence length, then every hash in
/// order. The empty sequence maps to [`EMPTY_DIGEST`].
pub fn digest(hashes: &[Hash]) -> Hash {
    if hashes.is_empty() {
        return EMPTY_DIGEST;
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(DIGEST_DOMAIN);
    hasher.update(&(hashes.len() as u64).to_be_bytes());
    for h in hashes {
        hasher.update(h.as_bytes());
    }
    Hash(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn h(tag: &[u8]) -> Hash {
        Hash::hash(tag)
    }

    #[test]
    fn test_empty_is_reserved_constant() {
        assert_eq!(digest(&[]), EMPTY_DIGEST);
        assert_ne!(digest(&[Hash::ZERO]), EMPTY_DIGEST);
    }

    #[test]
    fn test_deterministic() {
        let seq = [h(b"tx1"), h(b"tx2"), h(b"tx3")];
        assert_eq!(digest(&seq), digest(&seq));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(digest(&[h(b"a"), h(b"b")]), digest(&[h(b"b"), h(b"a")]));
    }

    #[test]
    fn test_not_plain_concatenation_hash() {
        let seq = [h(b"a"), h(b"b")];
        let mut concat = Vec::new();
        concat.extend_from_slice(seq[0].as_bytes());
        concat.extend_from_slice(seq[1].as_bytes());
        assert_ne!(digest(&seq), Hash::hash(&concat));
    }

    proptest! {
        #[test]
        fn prop_digest_deterministic(raw in prop::collection::vec(any::<[u8; 32]>(), 0..16)) {
            let hashes: Vec<Hash> = raw.into_iter().map(Hash::from_bytes).collect();
            prop_assert_eq!(digest(&hashes), digest(&hashes.clone()));
        }

        #[test]
        fn prop_swap_changes_digest(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            prop_assume!(a != b);
            let (a, b) = (Hash::from_bytes(a), Hash::from_bytes(b));
            prop_assert_ne!(digest(&[a, b]), digest(&[b, a]));
        }

        #[test]
        fn prop_non_empty_never_empty_digest(raw in prop::collection::vec(any::<[u8; 32]>(), 1..8)) {
            let hashes: Vec<Hash> = raw.into_iter().map(Hash::from_bytes).collect();
            prop_assert_ne!(digest(&hashes), EMPTY_DIGEST);
        }
    }
}
