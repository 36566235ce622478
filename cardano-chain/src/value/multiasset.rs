use super::{AssetName, PolicyId};
use crate::error::{ChainError, ChainResult};
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use std::collections::BTreeMap;

/// `AssetName -> i64`, re-sorted by (length, bytes) on every mutation and
/// evicting zero-valued entries under arithmetic (§3.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetNameMap(BTreeMap<AssetName, i64>);

impl AssetNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &AssetName) -> Option<i64> {
        self.0.get(name).copied()
    }

    /// Adds `delta` to the existing amount, evicting the entry if the sum
    /// is zero.
    pub fn insert(&mut self, name: AssetName, delta: i64) {
        let next = self.0.get(&name).copied().unwrap_or(0) + delta;
        if next == 0 {
            self.0.remove(&name);
        } else {
            self.0.insert(name, next);
        }
    }

    /// Inserts a raw (already-computed) amount without merging, rejecting
    /// zero — used when decoding from the wire, where a zero-valued entry
    /// would never legitimately appear.
    pub fn insert_raw(&mut self, name: AssetName, amount: i64) -> ChainResult<()> {
        if amount == 0 {
            return Err(ChainError::InvalidArgument(
                "multi-asset entry with amount zero".into(),
            ));
        }
        if self.0.insert(name, amount).is_some() {
            return Err(ChainError::DuplicatedKey {
                entity: "AssetNameMap",
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetName, &i64)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AssetName> {
        self.0.keys()
    }

    pub fn key_value_at(&self, i: usize) -> Option<(&AssetName, &i64)> {
        self.0.iter().nth(i)
    }

    pub fn value_at(&self, i: usize) -> Option<&i64> {
        self.0.values().nth(i)
    }
}

/// `PolicyId -> AssetNameMap`, sorted by `PolicyId` lexicographically, with
/// empty inner maps evicted under arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiAsset(BTreeMap<PolicyId, AssetNameMap>);

impl MultiAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, policy: &PolicyId, name: &AssetName) -> Option<i64> {
        self.0.get(policy).and_then(|inner| inner.get(name))
    }

    pub fn insert(&mut self, policy: PolicyId, name: AssetName, delta: i64) {
        let inner = self.0.entry(policy).or_default();
        inner.insert(name, delta);
        if inner.is_empty() {
            self.0.remove(&policy);
        }
    }

    pub fn policies(&self) -> impl Iterator<Item = &PolicyId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PolicyId, &AssetNameMap)> {
        self.0.iter()
    }

    pub fn iter_entries(&self) -> impl Iterator<Item = ((&PolicyId, &AssetName), i64)> {
        self.0
            .iter()
            .flat_map(|(p, m)| m.iter().map(move |(n, a)| ((p, n), *a)))
    }

    pub fn checked_add(&self, other: &Self) -> ChainResult<Self> {
        let mut result = self.clone();
        for ((policy, name), amount) in other.iter_entries() {
            let current = result.get(policy, name).unwrap_or(0);
            let next = current
                .checked_add(amount)
                .ok_or_else(|| ChainError::ArithmeticOverflow("multi-asset addition".into()))?;
            result.insert(*policy, name.clone(), next - current);
        }
        Ok(result)
    }

    pub fn checked_sub(&self, other: &Self) -> ChainResult<Self> {
        let mut result = self.clone();
        for ((policy, name), amount) in other.iter_entries() {
            let current = result.get(policy, name).unwrap_or(0);
            let next = current
                .checked_sub(amount)
                .ok_or_else(|| ChainError::ArithmeticOverflow("multi-asset subtraction".into()))?;
            result.insert(*policy, name.clone(), next - current);
        }
        Ok(result)
    }

    pub fn filter(&self, predicate: impl Fn(i64) -> bool) -> Self {
        let mut result = MultiAsset::new();
        for ((policy, name), amount) in self.iter_entries() {
            if predicate(amount) {
                result.insert(*policy, name.clone(), amount);
            }
        }
        result
    }
}

impl<'b, C> Decode<'b, C> for MultiAsset {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut result = MultiAsset::new();
        let len = d.map()?;
        let mut count = 0usize;
        loop {
            if let Some(len) = len {
                if count as u64 >= len {
                    break;
                }
            } else if d.datatype()? == minicbor::data::Type::Break {
                d.skip()?;
                break;
            }
            let policy: PolicyId = d.decode_with(ctx)?;
            if result.0.contains_key(&policy) {
                return Err(DecodeError::message("duplicate policy id decoding multiasset"));
            }
            let inner_len = d.map()?;
            let mut inner = AssetNameMap::new();
            let mut inner_count = 0usize;
            loop {
                if let Some(inner_len) = inner_len {
                    if inner_count as u64 >= inner_len {
                        break;
                    }
                } else if d.datatype()? == minicbor::data::Type::Break {
                    d.skip()?;
                    break;
                }
                let name: AssetName = d.decode_with(ctx)?;
                let amount: u64 = d.decode_with(ctx)?;
                inner
                    .insert_raw(name, amount as i64)
                    .map_err(|e| DecodeError::message(e.to_string()))?;
                inner_count += 1;
            }
            if !inner.is_empty() {
                result.0.insert(policy, inner);
            }
            count += 1;
        }
        Ok(result)
    }
}

impl<C> Encode<C> for MultiAsset {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.map(self.0.len() as u64)?;
        for (policy, inner) in &self.0 {
            policy.encode(e, ctx)?;
            e.map(inner.len() as u64)?;
            for (name, amount) in inner.iter() {
                name.encode(e, ctx)?;
                let amount = u64::try_from(*amount).map_err(|_| {
                    minicbor::encode::Error::message("negative asset amount in a positive value")
                })?;
                e.u64(amount)?;
            }
        }
        Ok(())
    }
}
