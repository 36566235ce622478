//! `big_int` per the CDDL: a plain `int` when it fits, otherwise tag 2
//! (positive bignum) or tag 3 (negative bignum) wrapping a big-endian byte
//! string. Grounded on the tag-dispatch used by `pallas_primitives`'
//! `plutus_data::BigInt`, generalized here so both `PlutusData` and the
//! value algebra's overflow-checked arithmetic can share one type.

use crate::{CodecError, CodecResult};
use minicbor::data::{IanaTag, Tag};
use minicbor::decode::Error as DecodeError;
use minicbor::{Decode, Encode};
use num_bigint::{BigInt as NumBigInt, Sign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BigInt(#[serde(with = "bigint_serde")] NumBigInt);

impl BigInt {
    pub fn from_i128(n: i128) -> Self {
        BigInt(NumBigInt::from(n))
    }

    pub fn to_i128(&self) -> CodecResult<i128> {
        self.0
            .try_into()
            .map_err(|_| CodecError::OutOfBounds("big_int does not fit in i128".into()))
    }

    pub fn inner(&self) -> &NumBigInt {
        &self.0
    }
}

impl From<NumBigInt> for BigInt {
    fn from(value: NumBigInt) -> Self {
        BigInt(value)
    }
}

/// Builds a [`BigInt`] from the big-endian magnitude bytes of a tag-2/3
/// bignum, given whether the negative form (tag 3) was used. Exposed so
/// callers that need to branch on the tag before delegating to
/// [`BigInt`]'s own `Decode` impl (e.g. a larger tagged union that shares
/// tags 2/3 with other alternatives) can still build the same value.
pub fn from_tagged_bytes(bytes: &[u8], negative: bool) -> BigInt {
    let magnitude = NumBigInt::from_bytes_be(Sign::Plus, bytes);
    if negative {
        BigInt(-(magnitude + NumBigInt::from(1)))
    } else {
        BigInt(magnitude)
    }
}

impl<'b, C> Decode<'b, C> for BigInt {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Tag => {
                let tag = d.tag()?;
                let bytes = d.bytes()?;
                let value = match tag.as_u64() {
                    2 => NumBigInt::from_bytes_be(Sign::Plus, bytes),
                    3 => {
                        let magnitude = NumBigInt::from_bytes_be(Sign::Plus, bytes);
                        -(magnitude + NumBigInt::from(1))
                    }
                    other => {
                        return Err(DecodeError::message(format!(
                            "unexpected tag {other} decoding big_int"
                        )))
                    }
                };
                Ok(BigInt(value))
            }
            _ => {
                let n: i128 = d.decode()?;
                Ok(BigInt(NumBigInt::from(n)))
            }
        }
    }
}

impl<C> Encode<C> for BigInt {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(n) = self.0.clone().try_into().ok().map(|n: i128| n) {
            // Fits a plain int: use the shortest form, matching every other
            // integer field in this codec.
            e.encode(n)?;
            return Ok(());
        }

        match self.0.sign() {
            Sign::Minus => {
                let magnitude = (-&self.0) - NumBigInt::from(1);
                let (_, bytes) = magnitude.to_bytes_be();
                e.tag(Tag::new(IanaTag::NegBignum.into()))?;
                e.bytes(&bytes)?;
            }
            _ => {
                let (_, bytes) = self.0.to_bytes_be();
                e.tag(Tag::new(IanaTag::PosBignum.into()))?;
                e.bytes(&bytes)?;
            }
        }

        Ok(())
    }
}

mod bigint_serde {
    use num_bigint::BigInt as NumBigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NumBigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NumBigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_use_plain_int() {
        let n = BigInt::from_i128(42);
        let cbor = minicbor::to_vec(&n).unwrap();
        // A plain positive fixint/uint, not a tagged bignum.
        assert_ne!(cbor[0] >> 5, 6);
    }

    #[test]
    fn large_positive_value_roundtrips_as_bignum() {
        let huge = NumBigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let n = BigInt::from(huge.clone());
        let cbor = minicbor::to_vec(&n).unwrap();
        let back: BigInt = minicbor::decode(&cbor).unwrap();
        assert_eq!(back.inner(), &huge);
    }

    #[test]
    fn large_negative_value_roundtrips_as_bignum() {
        let huge = -NumBigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let n = BigInt::from(huge.clone());
        let cbor = minicbor::to_vec(&n).unwrap();
        let back: BigInt = minicbor::decode(&cbor).unwrap();
        assert_eq!(back.inner(), &huge);
    }
}
