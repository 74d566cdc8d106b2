//! Length-tagged bit vectors for per-transaction execution results.
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8`, least significant
//! first, so a single byte reads as the integer sum of `2^i` over set bits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-length bit vector.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxBitmap {
    len: u32,
    #[serde(with = "serde_bytes_vec")]
    bits: Vec<u8>,
}

impl TxBitmap {
    /// An all-zero bitmap of `len` bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            len: len as u32,
            bits: vec![0u8; len.div_ceil(8)],
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Set bit `i`. Out-of-range indices are ignored.
    pub fn set(&mut self, i: usize, value: bool) {
        if i >= self.len() {
            return;
        }
        let mask = 1u8 << (i % 8);
        if let Some(byte) = self.bits.get_mut(i / 8) {
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read bit `i`; out-of-range reads are `false`.
    pub fn get(&self, i: usize) -> bool {
        i < self.len()
            && self
                .bits
                .get(i / 8)
                .is_some_and(|byte| byte & (1u8 << (i % 8)) != 0)
    }

    pub fn count_ones(&self) -> usize {
        self.iter().filter(|b| *b).count()
    }

    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl FromIterator<bool> for TxBitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let flags: Vec<bool> = iter.into_iter().collect();
        let mut bitmap = Self::zeroed(flags.len());
        for (i, flag) in flags.into_iter().enumerate() {
            bitmap.set(i, flag);
        }
        bitmap
    }
}

impl fmt::Debug for TxBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = self.iter().map(|b| if b { '1' } else { '0' }).collect();
        write!(f, "TxBitmap({bits})")
    }
}

/// Encode `Vec<u8>` as a CBOR byte string rather than an array of integers.
mod serde_bytes_vec {
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&hex::encode(bytes))
        } else {
            s.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        if d.is_human_readable() {
            d.deserialize_str(BytesVisitor)
        } else {
            d.deserialize_byte_buf(BytesVisitor)
        }
    }

    struct BytesVisitor;

    impl<'de> Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Vec<u8>, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Vec<u8>, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Vec<u8>, E> {
            hex::decode(v).map_err(E::custom)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<u8>, A::Error> {
            let mut out = Vec::new();
            while let Some(b) = seq.next_element()? {
                out.push(b);
            }
            Ok(out)
        }
    }
}
