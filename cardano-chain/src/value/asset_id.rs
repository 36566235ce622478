use super::{AssetName, PolicyId};
use std::cmp::Ordering;

/// Either the distinguished Lovelace token or a (policy, asset name) pair.
///
/// Its canonical byte encoding is `policy_id ‖ asset_name`; ordering puts
/// Lovelace first, then native tokens sorted by (encoded length, bytes) —
/// the comparator `AssetIdMap` and `MultiAsset`'s inner maps both rely on
/// for deterministic CBOR output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetId {
    Lovelace,
    Asset(PolicyId, AssetName),
}

impl AssetId {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            AssetId::Lovelace => Vec::new(),
            AssetId::Asset(policy, name) => {
                let mut v = Vec::with_capacity(28 + name.len());
                v.extend_from_slice(policy.as_ref());
                v.extend_from_slice(name.as_ref());
                v
            }
        }
    }

    pub fn is_lovelace(&self) -> bool {
        matches!(self, AssetId::Lovelace)
    }
}

impl PartialOrd for AssetId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssetId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AssetId::Lovelace, AssetId::Lovelace) => Ordering::Equal,
            (AssetId::Lovelace, AssetId::Asset(..)) => Ordering::Less,
            (AssetId::Asset(..), AssetId::Lovelace) => Ordering::Greater,
            (AssetId::Asset(..), AssetId::Asset(..)) => {
                let a = self.canonical_bytes();
                let b = other.canonical_bytes();
                a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
            }
        }
    }
}

/// A sorted `AssetId -> i64` map used for value diffing (§4.2), with
/// Lovelace ordered before every native token and native tokens ordered by
/// (byte length, bytes) of their canonical encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetIdMap(std::collections::BTreeMap<AssetId, i64>);

impl AssetIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &AssetId) -> Option<i64> {
        self.0.get(key).copied()
    }

    /// Adds `delta` to the existing amount for `key`, evicting the entry if
    /// the result is zero.
    pub fn insert(&mut self, key: AssetId, delta: i64) {
        let next = self.0.get(&key).copied().unwrap_or(0) + delta;
        if next == 0 {
            self.0.remove(&key);
        } else {
            self.0.insert(key, next);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &AssetId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &i64)> {
        self.0.iter()
    }

    pub fn key_value_at(&self, i: usize) -> Option<(&AssetId, &i64)> {
        self.0.iter().nth(i)
    }

    pub fn value_at(&self, i: usize) -> Option<&i64> {
        self.0.values().nth(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(policy_byte: u8, name: &[u8]) -> AssetId {
        AssetId::Asset(PolicyId::new([policy_byte; 28]), AssetName::new(name.to_vec()).unwrap())
    }

    #[test]
    fn lovelace_sorts_first() {
        let mut ids = vec![asset(1, b"a"), AssetId::Lovelace, asset(2, b"b")];
        ids.sort();
        assert_eq!(ids[0], AssetId::Lovelace);
    }

    #[test]
    fn native_tokens_sort_by_length_then_bytes() {
        let short = asset(1, b"a");
        let long = asset(1, b"aa");
        assert!(short < long);
    }

    #[test]
    fn map_evicts_zero_entries() {
        let mut m = AssetIdMap::new();
        m.insert(AssetId::Lovelace, 5);
        m.insert(AssetId::Lovelace, -5);
        assert!(m.is_empty());
    }
}
