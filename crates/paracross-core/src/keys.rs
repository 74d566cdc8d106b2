//! Storage key layout.
//!
//! Heights are written in decimal; per-height vote keys end with `-` before
//! the address so a height prefix never matches a longer height.

use crate::crypto::Address;
use crate::types::Title;

const TITLE_PREFIX: &str = "paracross-title-";
const TITLE_HEIGHT_PREFIX: &str = "paracross-titleHeight-";
const MINER_PREFIX: &str = "paracross-miner-";
const NODES_PREFIX: &str = "manage-paracross-nodes-";

/// Finalized state of a title.
pub fn title_key(title: &Title) -> Vec<u8> {
    format!("{TITLE_PREFIX}{title}").into_bytes()
}

/// Pending (or done) quorum record of a title at a height.
pub fn title_height_key(title: &Title, height: u64) -> Vec<u8> {
    format!("{TITLE_HEIGHT_PREFIX}{title}-{height}").into_bytes()
}

/// One validator's vote record.
pub fn miner_vote_key(title: &Title, height: u64, validator: &Address) -> Vec<u8> {
    let mut key = miner_vote_prefix(title, height);
    key.extend_from_slice(validator.to_hex().as_bytes());
    key
}

/// Prefix shared by every vote record of a title at a height.
pub fn miner_vote_prefix(title: &Title, height: u64) -> Vec<u8> {
    format!("{MINER_PREFIX}{title}-{height}-").into_bytes()
}

/// Governance entry listing a title's validators.
pub fn validator_nodes_key(title: &Title) -> Vec<u8> {
    format!("{NODES_PREFIX}{title}").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let title = Title::new("user.p.test.").unwrap();
        assert_eq!(title_key(&title), b"paracross-title-user.p.test.".to_vec());
        assert_eq!(
            title_height_key(&title, 7),
            b"paracross-titleHeight-user.p.test.-7".to_vec()
        );
        assert_eq!(
            validator_nodes_key(&title),
            b"manage-paracross-nodes-user.p.test.".to_vec()
        );
    }

    #[test]
    fn test_vote_prefix_does_not_match_longer_height() {
        let title = Title::new("user.p.test.").unwrap();
        let addr = Address::from_bytes([1; 32]);
        let key_12 = miner_vote_key(&title, 12, &addr);
        assert!(key_12.starts_with(&miner_vote_prefix(&title, 12)));
        assert!(!key_12.starts_with(&miner_vote_prefix(&title, 1)));
    }
}
