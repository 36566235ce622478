//! Tagged-set containers (CDDL `#6.258([* a])`).
//!
//! Unlike `pallas_codec::utils::Set`, which always re-emits tag 258 on
//! encode regardless of how the value was decoded, this container
//! remembers whether the tag was present in the bytes it was parsed from
//! and reproduces the same form on the way back out. A value built
//! programmatically (not decoded) defaults to tagged, since every set this
//! crate constructs from scratch is destined for the post-Conway wire
//! format where the tag is mandatory.

use minicbor::data::Tag;
use minicbor::decode::Error as DecodeError;
use minicbor::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const SET_TAG: u64 = 258;

/// A deduplicated, canonically ordered collection that may or may not have
/// been wrapped in tag 258 on the wire it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set<T: Ord> {
    items: BTreeSet<T>,
    tagged: bool,
}

/// Serde mirrors the CBOR shape: the tag presence travels alongside the
/// items rather than being folded into a distinct JSON representation.
#[derive(Serialize, Deserialize)]
struct SetRepr<T> {
    items: Vec<T>,
    tagged: bool,
}

impl<T: Ord + Clone + Serialize> Serialize for Set<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SetRepr {
            items: self.items.iter().cloned().collect(),
            tagged: self.tagged,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Ord + Deserialize<'de>> Deserialize<'de> for Set<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SetRepr::<T>::deserialize(deserializer)?;
        Ok(Set {
            items: repr.items.into_iter().collect(),
            tagged: repr.tagged,
        })
    }
}

impl<T: Ord> Set<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            tagged: true,
        }
    }

    pub fn with_tagged(items: impl IntoIterator<Item = T>, tagged: bool) -> Self {
        Self {
            items: items.into_iter().collect(),
            tagged,
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> BTreeSet<T> {
        self.items
    }

    pub fn insert(&mut self, value: T) -> bool {
        self.items.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'b, C, T> Decode<'b, C> for Set<T>
where
    T: Decode<'b, C> + Ord,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let tagged = if d.datatype()? == minicbor::data::Type::Tag {
            let tag = d.tag()?;
            if tag.as_u64() != SET_TAG {
                return Err(DecodeError::message(format!(
                    "unexpected tag {} decoding a set, expected 258",
                    tag.as_u64()
                )));
            }
            true
        } else {
            false
        };

        let items: Vec<T> = d.decode_with(ctx)?;
        let mut set = BTreeSet::new();
        for item in items {
            if !set.insert(item) {
                return Err(DecodeError::message("duplicate element decoding a set"));
            }
        }

        Ok(Self { items: set, tagged })
    }
}

impl<C, T> Encode<C> for Set<T>
where
    T: Encode<C> + Ord,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if self.tagged {
            e.tag(Tag::new(SET_TAG))?;
        }
        e.array(self.items.len() as u64)?;
        for item in &self.items {
            item.encode(e, ctx)?;
        }
        Ok(())
    }
}

/// Same as [`Set`] but rejects the empty collection on decode and
/// construction, for the handful of CDDL fields defined as
/// `#6.258([+ a])` (e.g. required-signers when present must be non-empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptySet<T: Ord>(Set<T>);

impl<T: Ord> NonEmptySet<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Option<Self> {
        let set = Set::new(items);
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.0.is_tagged()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeSet<T> {
        self.0.into_inner()
    }
}

impl<'b, C, T> Decode<'b, C> for NonEmptySet<T>
where
    T: Decode<'b, C> + Ord,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let set: Set<T> = d.decode_with(ctx)?;
        if set.is_empty() {
            return Err(DecodeError::message("decoded an empty NonEmptySet"));
        }
        Ok(Self(set))
    }
}

impl<C, T> Encode<C> for NonEmptySet<T>
where
    T: Encode<C> + Ord,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        self.0.encode(e, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_set_roundtrips_tag_presence() {
        let tagged = Set::with_tagged([1u8, 2, 3], true);
        let cbor = minicbor::to_vec(&tagged).unwrap();
        assert_eq!(cbor[0] >> 5, 6, "expected a CBOR tag major type");
        let back: Set<u8> = minicbor::decode(&cbor).unwrap();
        assert!(back.is_tagged());
        assert_eq!(back.into_inner(), tagged.into_inner());
    }

    #[test]
    fn untagged_set_roundtrips_without_tag() {
        let untagged = Set::with_tagged([1u8, 2, 3], false);
        let cbor = minicbor::to_vec(&untagged).unwrap();
        assert_ne!(cbor[0] >> 5, 6);
        let back: Set<u8> = minicbor::decode(&cbor).unwrap();
        assert!(!back.is_tagged());
    }

    #[test]
    fn decode_rejects_duplicate_members() {
        // array [1, 1, 2] tagged 258
        let mut buf = Vec::new();
        let mut e = minicbor::Encoder::new(&mut buf);
        e.tag(Tag::new(SET_TAG)).unwrap();
        e.array(3).unwrap();
        e.u8(1).unwrap();
        e.u8(1).unwrap();
        e.u8(2).unwrap();
        let result: Result<Set<u8>, _> = minicbor::decode(&buf);
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_set_rejects_empty() {
        let items: Vec<u8> = vec![];
        assert!(NonEmptySet::new(items).is_none());
    }
}
