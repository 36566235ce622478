//! Insertion-ordered map with duplicate-key rejection (spec §3.2): used for
//! withdrawals and the inner level of voting procedures, where the wire
//! format preserves caller insertion order instead of a canonical sort
//! (unlike the value algebra's `AssetNameMap`/`MultiAsset`, §3.2/§4.1).

use crate::error::ChainError;
use minicbor::{decode::Error as DecodeError, Decode, Encode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionOrderedMap<K, V>(Vec<(K, V)>);

impl<K, V> Default for InsertionOrderedMap<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K: PartialEq, V> InsertionOrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Rejects a key already present, per the "duplicate reward-address is
    /// rejected on insert" rule for withdrawals.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), ChainError> {
        if self.0.iter().any(|(k, _)| k == &key) {
            return Err(ChainError::DuplicatedKey {
                entity: "InsertionOrderedMap",
            });
        }
        self.0.push((key, value));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }
}

impl<'b, C, K, V> Decode<'b, C> for InsertionOrderedMap<K, V>
where
    K: Decode<'b, C> + PartialEq,
    V: Decode<'b, C>,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut map = InsertionOrderedMap::new();
        let len = d.map()?;
        match len {
            Some(len) => {
                for _ in 0..len {
                    let k: K = d.decode_with(ctx)?;
                    let v: V = d.decode_with(ctx)?;
                    map.insert(k, v)
                        .map_err(|e| DecodeError::message(e.to_string()))?;
                }
            }
            None => loop {
                if d.datatype()? == minicbor::data::Type::Break {
                    d.skip()?;
                    break;
                }
                let k: K = d.decode_with(ctx)?;
                let v: V = d.decode_with(ctx)?;
                map.insert(k, v)
                    .map_err(|e| DecodeError::message(e.to_string()))?;
            },
        }
        Ok(map)
    }
}

impl<C, K, V> Encode<C> for InsertionOrderedMap<K, V>
where
    K: Encode<C>,
    V: Encode<C>,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.map(self.0.len() as u64)?;
        for (k, v) in &self.0 {
            k.encode(e, ctx)?;
            v.encode(e, ctx)?;
        }
        Ok(())
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for InsertionOrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = InsertionOrderedMap::new();
        for (k, v) in iter {
            // Constructed programmatically: last write wins rather than
            // failing, since callers assembling a map from a trusted source
            // (e.g. a `HashMap`) already hold the uniqueness invariant.
            if let Some(slot) = map.0.iter_mut().find(|(existing, _)| existing == &k) {
                slot.1 = v;
            } else {
                map.0.push((k, v));
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_keys() {
        let mut m: InsertionOrderedMap<u8, u8> = InsertionOrderedMap::new();
        m.insert(1, 10).unwrap();
        assert!(m.insert(1, 20).is_err());
    }

    #[test]
    fn preserves_insertion_order_through_cbor() {
        let mut m: InsertionOrderedMap<u8, u8> = InsertionOrderedMap::new();
        m.insert(3, 30).unwrap();
        m.insert(1, 10).unwrap();
        m.insert(2, 20).unwrap();

        let cbor = minicbor::to_vec(&m).unwrap();
        let back: InsertionOrderedMap<u8, u8> = minicbor::decode(&cbor).unwrap();
        let keys: Vec<_> = back.keys().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }
}
