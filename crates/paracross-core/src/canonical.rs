//! Canonical CBOR encoding for consensus-relevant bytes.
//!
//! RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! Candidate fingerprints, transaction signing bytes, and block hashes are
//! all computed over this encoding so that every validator derives the same
//! bytes from the same values.

use ciborium::value::Value;

use crate::bitmap::TxBitmap;
use crate::crypto::Hash;
use crate::status::CommitCandidate;
use crate::transaction::Transaction;

const TX_DOMAIN: &[u8] = b"paracross-tx-v0:";
const BLOCK_DOMAIN: &[u8] = b"paracross-block-v0:";

/// Candidate field keys. Keys 0-23 encode as single bytes.
mod candidate_keys {
    pub const TITLE: u64 = 0;
    pub const HEIGHT: u64 = 1;
    pub const MAIN_BLOCK_HASH: u64 = 2;
    pub const MAIN_BLOCK_HEIGHT: u64 = 3;
    pub const PRE_BLOCK_HASH: u64 = 4;
    pub const BLOCK_HASH: u64 = 5;
    pub const PRE_STATE_HASH: u64 = 6;
    pub const STATE_HASH: u64 = 7;
    pub const TX_COUNT: u64 = 8;
    pub const TX_RESULT: u64 = 9;
    pub const TX_HASHES: u64 = 10;
    pub const CROSS_TX_RESULT: u64 = 11;
    pub const CROSS_TX_HASHES: u64 = 12;
}

mod tx_keys {
    pub const EXECUTOR: u64 = 0;
    pub const PAYLOAD: u64 = 1;
    pub const NONCE: u64 = 2;
    pub const GROUP: u64 = 3;
}

mod block_keys {
    pub const HEIGHT: u64 = 0;
    pub const PARENT_HASH: u64 = 1;
    pub const TX_HASHES: u64 = 2;
}

/// Canonical bytes of a commit candidate.
pub fn candidate_bytes(candidate: &CommitCandidate) -> Vec<u8> {
    encode_value_canonical(&candidate_to_value(candidate))
}

/// Blake3 over the canonical candidate bytes.
pub fn candidate_fingerprint(candidate: &CommitCandidate) -> Hash {
    Hash::hash(&candidate_bytes(candidate))
}

/// The message a transaction signature covers: domain || canonical tx.
pub fn transaction_signing_bytes(tx: &Transaction) -> Vec<u8> {
    let mut buf = TX_DOMAIN.to_vec();
    encode_value_to(&mut buf, &transaction_to_value(tx));
    buf
}

/// Hash of a block header built from height, parent, and transaction hashes.
pub fn block_hash(height: u64, parent_hash: &Hash, tx_hashes: &[Hash]) -> Hash {
    let value = Value::Map(vec![
        (key(block_keys::HEIGHT), uint(height)),
        (key(block_keys::PARENT_HASH), hash_value(parent_hash)),
        (key(block_keys::TX_HASHES), hashes_value(tx_hashes)),
    ]);
    let mut buf = BLOCK_DOMAIN.to_vec();
    encode_value_to(&mut buf, &value);
    Hash::hash(&buf)
}

fn candidate_to_value(c: &CommitCandidate) -> Value {
    use candidate_keys::*;

    Value::Map(vec![
        (key(TITLE), Value::Text(c.title.as_str().to_string())),
        (key(HEIGHT), uint(c.height)),
        (key(MAIN_BLOCK_HASH), hash_value(&c.main_block_hash)),
        (key(MAIN_BLOCK_HEIGHT), uint(c.main_block_height)),
        (key(PRE_BLOCK_HASH), hash_value(&c.pre_block_hash)),
        (key(BLOCK_HASH), hash_value(&c.block_hash)),
        (key(PRE_STATE_HASH), hash_value(&c.pre_state_hash)),
        (key(STATE_HASH), hash_value(&c.state_hash)),
        (key(TX_COUNT), uint(u64::from(c.tx_count))),
        (key(TX_RESULT), bitmap_value(&c.tx_result)),
        (key(TX_HASHES), hashes_value(&c.tx_hashes)),
        (key(CROSS_TX_RESULT), bitmap_value(&c.cross_tx_result)),
        (key(CROSS_TX_HASHES), hashes_value(&c.cross_tx_hashes)),
    ])
}

fn transaction_to_value(tx: &Transaction) -> Value {
    let group = match &tx.group {
        Some(g) => Value::Array(vec![
            hash_value(&g.id),
            uint(u64::from(g.index)),
            uint(u64::from(g.count)),
        ]),
        None => Value::Null,
    };

    Value::Map(vec![
        (key(tx_keys::EXECUTOR), Value::Text(tx.executor.clone())),
        (key(tx_keys::PAYLOAD), Value::Bytes(tx.payload.to_vec())),
        (key(tx_keys::NONCE), uint(tx.nonce)),
        (key(tx_keys::GROUP), group),
    ])
}

fn key(k: u64) -> Value {
    uint(k)
}

fn uint(n: u64) -> Value {
    Value::Integer(n.into())
}

fn hash_value(h: &Hash) -> Value {
    Value::Bytes(h.as_bytes().to_vec())
}

fn hashes_value(hashes: &[Hash]) -> Value {
    Value::Array(hashes.iter().map(hash_value).collect())
}

/// Bitmaps encode as `[len, bytes]` so trailing zero bits stay significant.
fn bitmap_value(b: &TxBitmap) -> Value {
    Value::Array(vec![uint(b.len() as u64), Value::Bytes(b.as_bytes().to_vec())])
}

fn encode_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
///
/// Only the value shapes built in this module reach here.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, i128::from(*i)),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item);
            }
        }
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Tag(tag, inner) => {
            encode_uint(buf, 6, *tag);
            encode_value_to(buf, inner);
        }
        _ => unreachable!("canonical values never carry floats"),
    }
}

/// Major types 0 and 1.
fn encode_integer(buf: &mut Vec<u8>, n: i128) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // -1 encodes as 0, -2 as 1, ...
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an argument with the given major type in its shortest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Major type 5 with keys sorted by their encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| (encode_value_canonical(k), v))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxGroup;
    use crate::types::Title;
    use bytes::Bytes;

    fn candidate() -> CommitCandidate {
        CommitCandidate {
            title: Title::new("user.p.test.").unwrap(),
            height: 1,
            main_block_hash: Hash::hash(b"main"),
            main_block_height: 10,
            pre_block_hash: Hash::ZERO,
            block_hash: Hash::hash(b"block"),
            pre_state_hash: Hash::ZERO,
            state_hash: Hash::hash(b"state"),
            tx_count: 2,
            tx_result: [true, false].into_iter().collect(),
            tx_hashes: vec![Hash::hash(b"a"), Hash::hash(b"b")],
            cross_tx_result: TxBitmap::zeroed(0),
            cross_tx_hashes: vec![],
        }
    }

    #[test]
    fn test_uint_shortest_form() {
        let cases: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (23, &[0x17]),
            (24, &[0x18, 0x18]),
            (255, &[0x18, 0xff]),
            (256, &[0x19, 0x01, 0x00]),
            (65536, &[0x1a, 0x00, 0x01, 0x00, 0x00]),
            (1 << 32, &[0x1b, 0, 0, 0, 1, 0, 0, 0, 0]),
        ];
        for (n, expected) in cases {
            let mut buf = Vec::new();
            encode_uint(&mut buf, 0, *n);
            assert_eq!(&buf, expected, "encoding {n}");
        }
    }

    #[test]
    fn test_map_keys_sorted() {
        let value = Value::Map(vec![(uint(10), uint(1)), (uint(2), uint(2)), (uint(0), uint(3))]);
        let bytes = encode_value_canonical(&value);
        assert_eq!(bytes, vec![0xa3, 0x00, 0x03, 0x02, 0x02, 0x0a, 0x01]);
    }

    #[test]
    fn test_negative_integers() {
        let mut buf = Vec::new();
        encode_integer(&mut buf, -1);
        encode_integer(&mut buf, -25);
        assert_eq!(buf, vec![0x20, 0x38, 0x18]);
    }

    #[test]
    fn test_candidate_bytes_are_valid_cbor() {
        let bytes = candidate_bytes(&candidate());
        let decoded: Value = ciborium::from_reader(&bytes[..]).unwrap();
        assert!(matches!(decoded, Value::Map(ref m) if m.len() == 13));
    }

    #[test]
    fn test_fingerprint_sensitive_to_every_hash_field() {
        let base = candidate_fingerprint(&candidate());

        let mut c = candidate();
        c.state_hash = Hash::hash(b"other");
        assert_ne!(candidate_fingerprint(&c), base);

        let mut c = candidate();
        c.tx_hashes.reverse();
        assert_ne!(candidate_fingerprint(&c), base);

        let mut c = candidate();
        c.tx_result = [true, false, false].into_iter().collect();
        assert_ne!(candidate_fingerprint(&c), base);
    }

    #[test]
    fn test_signing_bytes_cover_group() {
        let tx = Transaction::new("coins", Bytes::from_static(b"x"));
        let grouped = tx.clone().with_group(TxGroup {
            id: Hash::hash(b"g"),
            index: 0,
            count: 2,
        });
        let plain = transaction_signing_bytes(&tx);
        assert!(plain.starts_with(TX_DOMAIN));
        assert_ne!(plain, transaction_signing_bytes(&grouped));
    }
}
