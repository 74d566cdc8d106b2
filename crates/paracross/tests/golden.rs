//! Golden vectors for cross-implementation verification.
//!
//! Every implementation must derive identical:
//! - candidate bytes and fingerprints
//! - transaction signing bytes and hashes
//! - deterministic Ed25519 signatures
//! - hash-list digests

use paracross_core::canonical::{candidate_bytes, transaction_signing_bytes};
use paracross_core::{
    digest, CommitCandidate, Hash, Keypair, ParacrossAction, Title, Transaction,
};
use paracross_testkit::{verify_all_vectors, TestFixture};
use serde::{Deserialize, Serialize};

/// Canonical bytes of [`pinned_candidate`].
const PINNED_CANDIDATE_BYTES: &str = "ad006c757365722e702e746573742e01010258205984b7fccfae6c29d267146a822fbcd2fc806c145b04d38cbf770f0623ef6af1030a045820c6f82a4ac776e3dad774667aedfb15dc2ec83c3ed2f4ecc4d58e3dd0aadb96dd0558203785b3823ba6d122d7d31ece5a44b2e4fca591a58f6a58ac377eb50632f3aa1b06582042cde1b455412d2da31bf328fa2252f7c0e57cf9776025c9aef4b177c5635dea075820dfa6bc72cfa1ed0788515eda8b4a36ea557814afc926e50588c6fdc6addd595d080209820241010a825820b4b2165c9a73cc30cecc4af4b2bfb6f8f3ae0dd73331f114a055482bcaf62ee358200a932f8e5b226eccc8f418898c18f5120a8f0700366c190e256041aecf42a4000b820141010c8158200a932f8e5b226eccc8f418898c18f5120a8f0700366c190e256041aecf42a400";

/// Fingerprint of [`pinned_candidate`].
const PINNED_FINGERPRINT: &str = "6ee99211af82f48f0ad3f02f0d5e71d353a635a6bdbce9627aa2d82ce9c351d9";

/// A single golden vector for a signed commit.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitVector {
    pub name: String,
    pub validator_seed: String,
    pub validator: String,
    pub candidate_bytes: String,
    pub fingerprint: String,
    pub signing_bytes: String,
    pub tx_hash: String,
    pub signature: String,
}

/// A candidate built only from literal inputs.
fn pinned_candidate() -> CommitCandidate {
    CommitCandidate {
        title: Title::new("user.p.test.").unwrap(),
        height: 1,
        main_block_hash: Hash::hash(b"main-10"),
        main_block_height: 10,
        pre_block_hash: Hash::hash(b"block-0"),
        block_hash: Hash::hash(b"block-1"),
        pre_state_hash: Hash::hash(b"state-0"),
        state_hash: Hash::hash(b"state-1"),
        tx_count: 2,
        tx_result: [true, false].into_iter().collect(),
        tx_hashes: vec![Hash::hash(b"tx-0"), Hash::hash(b"tx-1")],
        cross_tx_result: [true].into_iter().collect(),
        cross_tx_hashes: vec![Hash::hash(b"tx-1")],
    }
}

fn generate_vector(name: &str, seed: [u8; 32], height: u64) -> CommitVector {
    let fixture = TestFixture::new();
    let keypair = Keypair::from_seed(&seed);
    let candidate = fixture.chained_candidate(height);

    let tx = Transaction::paracross(&ParacrossAction::Commit(candidate.clone())).unwrap();
    let signing_bytes = transaction_signing_bytes(&tx);
    let signed = tx.sign(&keypair);

    CommitVector {
        name: name.to_string(),
        validator_seed: hex::encode(seed),
        validator: keypair.address().to_hex(),
        candidate_bytes: hex::encode(candidate_bytes(&candidate)),
        fingerprint: candidate.fingerprint().to_hex(),
        signing_bytes: hex::encode(signing_bytes),
        tx_hash: signed.hash().to_hex(),
        signature: signed.signature.to_hex(),
    }
}

fn commit_vectors() -> Vec<CommitVector> {
    vec![
        generate_vector("genesis commit", [1; 32], 0),
        generate_vector("second height", [2; 32], 1),
        generate_vector("deep height", [3; 32], 300),
    ]
}

#[test]
fn test_pinned_candidate_bytes() {
    let candidate = pinned_candidate();
    assert_eq!(hex::encode(candidate_bytes(&candidate)), PINNED_CANDIDATE_BYTES);
    assert_eq!(candidate.fingerprint().to_hex(), PINNED_FINGERPRINT);
}

#[test]
fn test_commit_vectors_deterministic() {
    assert_eq!(commit_vectors(), commit_vectors());
}

#[test]
fn test_fingerprint_is_hash_of_candidate_bytes() {
    for v in commit_vectors() {
        let bytes = hex::decode(&v.candidate_bytes).unwrap();
        assert_eq!(Hash::hash(&bytes).to_hex(), v.fingerprint, "{}", v.name);
    }
}

#[test]
fn test_signing_bytes_carry_domain() {
    for v in commit_vectors() {
        let bytes = hex::decode(&v.signing_bytes).unwrap();
        assert!(bytes.starts_with(b"paracross-tx-v0:"), "{}", v.name);
    }
}

#[test]
fn test_signatures_verify() {
    let fixture = TestFixture::new();
    let keypair = Keypair::from_seed(&[1; 32]);
    let tx = Transaction::paracross(&ParacrossAction::Commit(fixture.chained_candidate(0)))
        .unwrap()
        .sign(&keypair);
    assert_eq!(tx.recover_signer().unwrap(), keypair.address());
}

#[test]
fn test_digest_vectors() {
    for (name, matches, computed) in verify_all_vectors() {
        assert!(matches, "digest vector '{name}' produced {computed}");
    }
    assert_eq!(digest(&[]), Hash::ZERO);
}

#[test]
fn print_golden_vectors() {
    let json = serde_json::to_string_pretty(&commit_vectors()).unwrap();
    println!("{json}");
}
