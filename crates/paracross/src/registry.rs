//! Validator registry: which addresses may commit for a title.

use paracross_core::keys::validator_nodes_key;
use paracross_core::status::to_cbor;
use paracross_core::{Address, Title};
use paracross_store::{KeyValue, KvStore, StoreExt};

use crate::error::Result;

/// Ordered, deduplicated validator addresses of one title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    members: Vec<Address>,
}

impl ValidatorSet {
    /// Build a set, keeping the first occurrence of each address.
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        let mut members: Vec<Address> = Vec::new();
        for addr in addresses {
            if !members.contains(&addr) {
                members.push(addr);
            }
        }
        Self { members }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Strict majority: `floor(n / 2) + 1`.
    pub fn threshold(&self) -> usize {
        self.members.len() / 2 + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> + '_ {
        self.members.iter()
    }
}

/// Resolves a title to its validator set.
pub trait ValidatorRegistry: Send + Sync {
    fn validator_set(&self, title: &Title) -> Result<ValidatorSet>;
}

/// Registry backed by the governance entries of a key/value store.
///
/// A title without a governance entry has no validators.
#[derive(Debug, Clone)]
pub struct StoreRegistry<S> {
    store: S,
}

impl<S: KvStore> StoreRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write the governance entry for `title`.
    pub fn set_validators(&self, title: &Title, validators: &[Address]) -> Result<()> {
        let set = ValidatorSet::new(validators.iter().copied());
        let value = to_cbor(&set.members)?;
        self.store
            .apply(&[KeyValue::new(validator_nodes_key(title), value)])?;
        tracing::debug!(%title, validators = set.len(), "updated validator set");
        Ok(())
    }
}

impl<S: KvStore> ValidatorRegistry for StoreRegistry<S> {
    fn validator_set(&self, title: &Title) -> Result<ValidatorSet> {
        let members: Option<Vec<Address>> = self.store.get_decoded(&validator_nodes_key(title))?;
        Ok(ValidatorSet::new(members.unwrap_or_default()))
    }
}

impl<R: ValidatorRegistry + ?Sized> ValidatorRegistry for &R {
    fn validator_set(&self, title: &Title) -> Result<ValidatorSet> {
        (**self).validator_set(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paracross_store::MemoryStore;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 32])
    }

    #[test]
    fn test_threshold() {
        let sizes_and_thresholds = [(1, 1), (2, 2), (3, 2), (4, 3), (5, 3), (7, 4)];
        for (n, expected) in sizes_and_thresholds {
            let set = ValidatorSet::new((0..n).map(addr));
            assert_eq!(set.threshold(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_dedup_keeps_first_order() {
        let set = ValidatorSet::new([addr(3), addr(1), addr(3), addr(2)]);
        let order: Vec<Address> = set.iter().copied().collect();
        assert_eq!(order, vec![addr(3), addr(1), addr(2)]);
    }

    #[test]
    fn test_store_registry_roundtrip() {
        let registry = StoreRegistry::new(MemoryStore::new());
        let title = Title::new("user.p.test.").unwrap();
        let other = Title::new("user.p.other.").unwrap();

        registry
            .set_validators(&title, &[addr(1), addr(2), addr(1)])
            .unwrap();

        let set = registry.validator_set(&title).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&addr(2)));
        assert!(registry.validator_set(&other).unwrap().is_empty());
    }
}
