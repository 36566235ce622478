//! Redeemers: the values supplied at spend/mint/cert/reward/vote/propose
//! time to a Plutus script, each carrying the resource budget the balancer
//! fills in after the external evaluator runs (§4.6, §4.7 step 8).

use crate::plutus::PlutusData;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedeemerTag {
    Spend,
    Mint,
    Cert,
    Reward,
    Vote,
    Propose,
}

impl RedeemerTag {
    fn code(self) -> u8 {
        match self {
            RedeemerTag::Spend => 0,
            RedeemerTag::Mint => 1,
            RedeemerTag::Cert => 2,
            RedeemerTag::Reward => 3,
            RedeemerTag::Vote => 4,
            RedeemerTag::Propose => 5,
        }
    }

    fn from_code(code: u8) -> Result<Self, DecodeError> {
        Ok(match code {
            0 => RedeemerTag::Spend,
            1 => RedeemerTag::Mint,
            2 => RedeemerTag::Cert,
            3 => RedeemerTag::Reward,
            4 => RedeemerTag::Vote,
            5 => RedeemerTag::Propose,
            other => return Err(DecodeError::message(format!("unknown redeemer tag {other}"))),
        })
    }
}

impl<'b, C> Decode<'b, C> for RedeemerTag {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        Self::from_code(d.u8()?)
    }
}

impl<C> Encode<C> for RedeemerTag {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u8(self.code())?;
        Ok(())
    }
}

/// (memory, steps) pair bounding a script's resource use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExUnits {
    pub mem: u64,
    pub steps: u64,
}

impl<'b, C> Decode<'b, C> for ExUnits {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(ExUnits {
            mem: d.decode_with(ctx)?,
            steps: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for ExUnits {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        e.u64(self.mem)?;
        e.u64(self.steps)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeemer {
    pub tag: RedeemerTag,
    pub index: u32,
    pub data: PlutusData,
    pub ex_units: ExUnits,
}

impl<'b, C> Decode<'b, C> for Redeemer {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(Redeemer {
            tag: d.decode_with(ctx)?,
            index: d.decode_with(ctx)?,
            data: d.decode_with(ctx)?,
            ex_units: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for Redeemer {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(4)?;
        self.tag.encode(e, ctx)?;
        e.u32(self.index)?;
        self.data.encode(e, ctx)?;
        self.ex_units.encode(e, ctx)?;
        Ok(())
    }
}

/// Either the legacy array-of-redeemers form or the Conway-era map keyed by
/// (tag, index). Remembers which form it was decoded from and re-emits the
/// same one, the same form-preservation pattern `cardano_codec::set::Set`
/// applies to tag 258 (spec.md:198's "redeemer list (pre- and post-Conway
/// key/array forms)" bit-exact round-trip requirement). A value built
/// programmatically defaults to the map form, since that is the only form
/// the balancer ever constructs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redeemers {
    List(Vec<Redeemer>),
    Map(Vec<Redeemer>),
}

impl Default for Redeemers {
    fn default() -> Self {
        Redeemers::Map(Vec::new())
    }
}

impl Redeemers {
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[Redeemer] {
        match self {
            Redeemers::List(v) | Redeemers::Map(v) => v,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Redeemer] {
        match self {
            Redeemers::List(v) | Redeemers::Map(v) => v,
        }
    }
}

impl<'b, C> Decode<'b, C> for Redeemers {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                Ok(Redeemers::List(d.decode_with(ctx)?))
            }
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                let len = d.map()?;
                let mut redeemers = Vec::new();
                let mut read_one = |d: &mut minicbor::Decoder<'b>| -> Result<(), DecodeError> {
                    d.array()?;
                    let tag: RedeemerTag = d.decode_with(ctx)?;
                    let index: u32 = d.decode_with(ctx)?;
                    d.array()?;
                    let data: PlutusData = d.decode_with(ctx)?;
                    let ex_units: ExUnits = d.decode_with(ctx)?;
                    redeemers.push(Redeemer {
                        tag,
                        index,
                        data,
                        ex_units,
                    });
                    Ok(())
                };
                match len {
                    Some(len) => {
                        for _ in 0..len {
                            read_one(d)?;
                        }
                    }
                    None => loop {
                        if d.datatype()? == minicbor::data::Type::Break {
                            d.skip()?;
                            break;
                        }
                        read_one(d)?;
                    },
                }
                Ok(Redeemers::Map(redeemers))
            }
            other => Err(DecodeError::message(format!(
                "unexpected cbor type {other:?} decoding redeemers"
            ))),
        }
    }
}

impl<C> Encode<C> for Redeemers {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Redeemers::List(redeemers) => {
                e.array(redeemers.len() as u64)?;
                for redeemer in redeemers {
                    redeemer.encode(e, ctx)?;
                }
            }
            Redeemers::Map(redeemers) => {
                e.map(redeemers.len() as u64)?;
                for redeemer in redeemers {
                    e.array(2)?;
                    redeemer.tag.encode(e, ctx)?;
                    e.u32(redeemer.index)?;
                    e.array(2)?;
                    redeemer.data.encode(e, ctx)?;
                    redeemer.ex_units.encode(e, ctx)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_codec::bigint::BigInt;

    fn sample_redeemer() -> Redeemer {
        Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: PlutusData::BigInt(BigInt::from_i128(1)),
            ex_units: ExUnits { mem: 100, steps: 200 },
        }
    }

    #[test]
    fn redeemers_map_roundtrips() {
        let redeemers = Redeemers::Map(vec![sample_redeemer()]);
        let cbor = minicbor::to_vec(&redeemers).unwrap();
        assert_eq!(cbor[0] >> 5, 5, "expected a CBOR map major type");
        let back: Redeemers = minicbor::decode(&cbor).unwrap();
        assert_eq!(redeemers, back);
        assert!(matches!(back, Redeemers::Map(_)));
    }

    #[test]
    fn redeemers_list_form_is_preserved_through_a_round_trip() {
        let redeemers = Redeemers::List(vec![sample_redeemer()]);
        let cbor = minicbor::to_vec(&redeemers).unwrap();
        assert_eq!(cbor[0] >> 5, 4, "expected a CBOR array major type");
        let back: Redeemers = minicbor::decode(&cbor).unwrap();
        assert_eq!(redeemers, back);
        assert!(matches!(back, Redeemers::List(_)));

        // The legacy array form must re-encode byte-for-byte, not silently
        // upgrade to the Conway map form.
        let re_encoded = minicbor::to_vec(&back).unwrap();
        assert_eq!(re_encoded, cbor);
    }

    #[test]
    fn default_redeemers_is_the_map_form_and_empty() {
        let redeemers = Redeemers::default();
        assert!(redeemers.is_empty());
        assert!(matches!(redeemers, Redeemers::Map(v) if v.is_empty()));
    }
}
