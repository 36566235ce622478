//! Rational numbers (CDDL `rational_number = #6.30([uint, uint])`), used for
//! the pool margin, epoch expansion/treasury rates and the various voting
//! thresholds carried by protocol parameters. Grounded on the tag-30
//! dispatch in `pallas_primitives::alonzo::RationalNumber`.

use minicbor::data::Tag;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

const RATIONAL_TAG: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationalNumber {
    pub numerator: u64,
    pub denominator: u64,
}

impl RationalNumber {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        RationalNumber {
            numerator,
            denominator,
        }
    }
}

/// `UnitInterval` is the same wire shape, conventionally restricted to
/// `numerator <= denominator`; the core does not enforce that bound, since
/// it only ever carries values a caller or the chain already validated.
pub type UnitInterval = RationalNumber;

impl<'b, C> Decode<'b, C> for RationalNumber {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let tag = d.tag()?;
        if tag.as_u64() != RATIONAL_TAG {
            return Err(DecodeError::message(format!(
                "unexpected tag {} decoding a rational number, expected 30",
                tag.as_u64()
            )));
        }
        d.array()?;
        Ok(RationalNumber {
            numerator: d.decode_with(ctx)?,
            denominator: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for RationalNumber {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(RATIONAL_TAG))?;
        e.array(2)?;
        e.u64(self.numerator)?;
        e.u64(self.denominator)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_cbor() {
        let r = RationalNumber::new(1, 2);
        let cbor = minicbor::to_vec(&r).unwrap();
        assert_eq!(cbor[0] >> 5, 6, "expected a tagged value");
        let back: RationalNumber = minicbor::decode(&cbor).unwrap();
        assert_eq!(r, back);
    }
}
