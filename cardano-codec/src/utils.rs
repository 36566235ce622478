//! Round-trip friendly primitive wire types shared by every entity.
//!
//! These mirror `pallas_codec::utils` closely: thin wrappers around
//! `minicbor`'s primitives that add the semantics Cardano's CDDL needs
//! (non-zero integers, nullable fields, raw-bytes preservation for hashing).

use minicbor::{data::Tag, decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

/// Arbitrary binary payload, displayed/parsed as hex the way every hash and
/// asset name newtype in the corpus does.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Bytes(Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(xs: Vec<u8>) -> Self {
        Bytes(xs)
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Self {
        b.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let v = hex::decode(s).map_err(serde::de::Error::custom)?;
        Ok(Bytes(v))
    }
}

impl<'b, C> Decode<'b, C> for Bytes {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        Ok(Bytes(d.bytes()?.to_vec()))
    }
}

impl<C> Encode<C> for Bytes {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

/// A uint/nint that is never zero (CDDL's `nonZeroInt64`), used for mint
/// entries: zero-valued mint quantities are rejected rather than silently
/// produced, matching the zero-elision invariant of the value algebra.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonZeroInt(i64);

impl TryFrom<i64> for NonZeroInt {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(value)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<NonZeroInt> for i64 {
    fn from(value: NonZeroInt) -> Self {
        value.0
    }
}

impl<'b, C> Decode<'b, C> for NonZeroInt {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let n: i64 = d.decode_with(ctx)?;
        Self::try_from(n).map_err(|_| DecodeError::message("decoding 0 as NonZeroInt"))
    }
}

impl<C> Encode<C> for NonZeroInt {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.encode(self.0)?;
        Ok(())
    }
}

/// CDDL's `positive_coin` (1 .. max u64), used for the multi-asset amounts
/// carried by a `Value`. Zero is rejected by construction so the zero-
/// elision invariant (§4.2) cannot be violated by a round-trip.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositiveCoin(u64);

impl TryFrom<u64> for PositiveCoin {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(value)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<PositiveCoin> for u64 {
    fn from(value: PositiveCoin) -> Self {
        value.0
    }
}

impl<'b, C> Decode<'b, C> for PositiveCoin {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let n: u64 = d.decode_with(ctx)?;
        Self::try_from(n).map_err(|_| DecodeError::message("decoding 0 as PositiveCoin"))
    }
}

impl<C> Encode<C> for PositiveCoin {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.encode(self.0)?;
        Ok(())
    }
}

/// Decodes a value while retaining a copy of the exact bytes it came from,
/// so a caller can re-hash the identical on-chain bytes instead of a
/// re-encoded (and possibly non-bit-identical, e.g. non-minimal integer
/// encoding) copy. Mirrors `pallas_codec::utils::KeepRaw`, but owns its raw
/// bytes (`Vec<u8>`) rather than borrowing from the decode buffer: every
/// entity in this core is a self-contained owned value (§3.4) with no
/// lifetime tied to the bytes it was parsed from, and `KeepRaw` is no
/// exception — it only needs to preserve the bytes, not the borrow.
///
/// Ordering and equality are delegated entirely to the decoded value, not
/// the raw bytes: two bit-different encodings of the same logical value are
/// still the same set member for dedup/sort purposes (§4.1's canonical-
/// comparator contract), while `raw_cbor()` remains available for hashing.
#[derive(Debug, Clone)]
pub struct KeepRaw<T> {
    raw: Vec<u8>,
    inner: T,
}

impl<T> KeepRaw<T> {
    /// Wraps a programmatically-built value, canonically encoding it once
    /// up front so `raw_cbor()` is always populated.
    pub fn new(inner: T) -> Self
    where
        T: Encode<()>,
    {
        let raw = minicbor::to_vec(&inner).expect("encoding an in-memory value is infallible");
        Self { inner, raw }
    }

    pub fn raw_cbor(&self) -> &[u8] {
        &self.raw
    }

    pub fn unwrap(self) -> T {
        self.inner
    }
}

impl<T: PartialEq> PartialEq for KeepRaw<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq> Eq for KeepRaw<T> {}

impl<T: PartialOrd> PartialOrd for KeepRaw<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<T: Ord> Ord for KeepRaw<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<T> Deref for KeepRaw<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Serialize> Serialize for KeepRaw<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for KeepRaw<T>
where
    T: Deserialize<'de> + Encode<()>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(KeepRaw::new(T::deserialize(deserializer)?))
    }
}

impl<'b, T, C> Decode<'b, C> for KeepRaw<T>
where
    T: Decode<'b, C>,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let all = d.input();
        let start = d.position();
        let inner = d.decode_with(ctx)?;
        let end = d.position();

        Ok(Self {
            inner,
            raw: all[start..end].to_vec(),
        })
    }
}

impl<C, T> Encode<C> for KeepRaw<T> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.writer_mut()
            .write_all(&self.raw)
            .map_err(minicbor::encode::Error::write)
    }
}

/// `null` / `undefined` / present value, as used by a handful of optional
/// Conway fields that distinguish "absent" from "explicitly null".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option::<T>", into = "Option::<T>")]
pub enum Nullable<T>
where
    T: Clone,
{
    Some(T),
    Null,
    Undefined,
}

impl<T: Clone> From<Option<T>> for Nullable<T> {
    fn from(x: Option<T>) -> Self {
        match x {
            Some(x) => Nullable::Some(x),
            None => Nullable::Null,
        }
    }
}

impl<T: Clone> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        match value {
            Nullable::Some(x) => Some(x),
            _ => None,
        }
    }
}

impl<'b, C, T> Decode<'b, C> for Nullable<T>
where
    T: Decode<'b, C> + Clone,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Null => {
                d.null()?;
                Ok(Self::Null)
            }
            minicbor::data::Type::Undefined => {
                d.undefined()?;
                Ok(Self::Undefined)
            }
            _ => Ok(Self::Some(d.decode_with(ctx)?)),
        }
    }
}

impl<C, T> Encode<C> for Nullable<T>
where
    T: Encode<C> + Clone,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Nullable::Some(x) => e.encode_with(x, ctx).map(|_| ()),
            Nullable::Null => e.null().map(|_| ()),
            Nullable::Undefined => e.undefined().map(|_| ()),
        }
    }
}

/// Wraps a value so it is encoded as `#6.24(bytes .cbor value)`: the
/// `script_ref` / inline-datum convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CborWrap<T>(pub T);

impl<T> Deref for CborWrap<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'b, C, T> Decode<'b, C> for CborWrap<T>
where
    T: Decode<'b, C>,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.tag()?;
        let cbor = d.bytes()?;
        let wrapped = minicbor::decode_with(cbor, ctx)?;
        Ok(CborWrap(wrapped))
    }
}

impl<C, T> Encode<C> for CborWrap<T>
where
    T: Encode<C>,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let buf = minicbor::to_vec_with(&self.0, ctx)
            .map_err(|_| minicbor::encode::Error::message("error encoding cbor-wrapped value"))?;
        e.tag(Tag::new(24))?;
        e.bytes(&buf)?;
        Ok(())
    }
}

/// Chunked bytes/text with the 64-byte-per-chunk on-chain metadatum limit
/// (spec §4.3, §6, §8 S6). Encoding a node whose payload is bigger than
/// the limit is a hard `InvalidMetadatumBoundedBytesSize`, unlike
/// `BoundedBytes` in the ledger entity codec (which chunks transparently):
/// the tx-metadata wire format forbids splitting, so callers must chunk
/// themselves before handing data to this type.
pub const METADATUM_BOUNDED_BYTES_LIMIT: usize = 64;

pub fn check_bounded_size(len: usize) -> crate::CodecResult<()> {
    if len > METADATUM_BOUNDED_BYTES_LIMIT {
        Err(crate::CodecError::BoundedBytesSize {
            actual: len,
            limit: METADATUM_BOUNDED_BYTES_LIMIT,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip() {
        let b = Bytes::from(vec![1, 2, 3, 4]);
        let cbor = minicbor::to_vec(&b).unwrap();
        let back: Bytes = minicbor::decode(&cbor).unwrap();
        assert_eq!(b, back);
    }

    #[test]
    fn positive_coin_rejects_zero() {
        assert!(PositiveCoin::try_from(0u64).is_err());
        assert!(PositiveCoin::try_from(1u64).is_ok());
    }

    #[test]
    fn non_zero_int_rejects_zero() {
        assert!(NonZeroInt::try_from(0i64).is_err());
        assert_eq!(i64::from(NonZeroInt::try_from(-5i64).unwrap()), -5);
    }

    #[test]
    fn bounded_size_enforced() {
        assert!(check_bounded_size(64).is_ok());
        assert!(check_bounded_size(65).is_err());
    }

    #[test]
    fn keep_raw_preserves_non_canonical_bytes_through_a_round_trip() {
        // A `u32` encoded as a 5-byte non-minimal integer (`0x1a 00 00 00 01`)
        // instead of the canonical 1-byte form. A plain `Decode`/`Encode`
        // round trip would re-emit the minimal form; `KeepRaw` must not.
        let non_minimal = [0x1a, 0x00, 0x00, 0x00, 0x01];
        let kept: KeepRaw<u32> = minicbor::decode(&non_minimal).unwrap();
        assert_eq!(*kept, 1u32);
        assert_eq!(kept.raw_cbor(), &non_minimal);

        let re_encoded = minicbor::to_vec(&kept).unwrap();
        assert_eq!(re_encoded, non_minimal);
    }

    #[test]
    fn keep_raw_programmatic_value_encodes_canonically() {
        let kept = KeepRaw::new(7u32);
        let cbor = minicbor::to_vec(&kept).unwrap();
        assert_eq!(cbor, vec![7]);
    }
}
