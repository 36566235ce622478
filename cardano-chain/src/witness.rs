//! The transaction witness set (spec §4.1 Component E). Grounded on
//! `pallas_primitives::conway::WitnessSet`; the vkey-witness and
//! plutus-script fields carry the same tag-258 set semantics as the body's
//! input set (§3.2). The native-script and plutus-data sets additionally
//! wrap their elements in `KeepRaw` (SPEC_FULL.md's ambient-stack
//! requirement) so a witness set decoded from non-canonical CBOR (e.g. a
//! non-minimal integer inside a nested `PlutusData`) re-hashes to the same
//! bytes it arrived as, rather than a canonically re-encoded copy.

use crate::native_script::NativeScript;
use crate::plutus::PlutusData;
use crate::redeemer::Redeemers;
use crate::script::PlutusScript;
use cardano_codec::set::Set;
use cardano_codec::utils::{Bytes, KeepRaw};
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VKeyWitness {
    pub vkey: Bytes,
    pub signature: Bytes,
}

impl<'b, C> Decode<'b, C> for VKeyWitness {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(VKeyWitness {
            vkey: d.decode_with(ctx)?,
            signature: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for VKeyWitness {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.vkey.encode(e, ctx)?;
        self.signature.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BootstrapWitness {
    pub public_key: Bytes,
    pub signature: Bytes,
    pub chain_code: Bytes,
    pub attributes: Bytes,
}

impl<'b, C> Decode<'b, C> for BootstrapWitness {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(BootstrapWitness {
            public_key: d.decode_with(ctx)?,
            signature: d.decode_with(ctx)?,
            chain_code: d.decode_with(ctx)?,
            attributes: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for BootstrapWitness {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(4)?;
        self.public_key.encode(e, ctx)?;
        self.signature.encode(e, ctx)?;
        self.chain_code.encode(e, ctx)?;
        self.attributes.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessSet {
    pub vkeywitness: Option<Set<VKeyWitness>>,
    pub native_script: Option<Set<KeepRaw<NativeScript>>>,
    pub bootstrap_witness: Option<Set<BootstrapWitness>>,
    pub plutus_v1_script: Option<Set<PlutusScript<1>>>,
    pub plutus_data: Option<Set<KeepRaw<PlutusData>>>,
    pub redeemer: Redeemers,
    pub plutus_v2_script: Option<Set<PlutusScript<2>>>,
    pub plutus_v3_script: Option<Set<PlutusScript<3>>>,
}

impl<'b, C> Decode<'b, C> for WitnessSet {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut out = WitnessSet::default();
        let len = d.map()?;
        let mut remaining = len;
        loop {
            match remaining {
                Some(0) => break,
                Some(n) => remaining = Some(n - 1),
                None => {
                    if d.datatype()? == minicbor::data::Type::Break {
                        d.skip()?;
                        break;
                    }
                }
            }
            let idx = d.u8()?;
            match idx {
                0 => out.vkeywitness = Some(d.decode_with(ctx)?),
                1 => out.native_script = Some(d.decode_with(ctx)?),
                2 => out.bootstrap_witness = Some(d.decode_with(ctx)?),
                3 => out.plutus_v1_script = Some(d.decode_with(ctx)?),
                4 => out.plutus_data = Some(d.decode_with(ctx)?),
                5 => out.redeemer = d.decode_with(ctx)?,
                6 => out.plutus_v2_script = Some(d.decode_with(ctx)?),
                7 => out.plutus_v3_script = Some(d.decode_with(ctx)?),
                other => {
                    return Err(DecodeError::message(format!(
                        "unknown witness set field {other}"
                    )))
                }
            }
        }
        Ok(out)
    }
}

impl<C> Encode<C> for WitnessSet {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let len = self.vkeywitness.is_some() as u64
            + self.native_script.is_some() as u64
            + self.bootstrap_witness.is_some() as u64
            + self.plutus_v1_script.is_some() as u64
            + self.plutus_data.is_some() as u64
            + !self.redeemer.is_empty() as u64
            + self.plutus_v2_script.is_some() as u64
            + self.plutus_v3_script.is_some() as u64;
        e.map(len)?;
        if let Some(set) = &self.vkeywitness {
            e.u8(0)?;
            set.encode(e, ctx)?;
        }
        if let Some(set) = &self.native_script {
            e.u8(1)?;
            set.encode(e, ctx)?;
        }
        if let Some(set) = &self.bootstrap_witness {
            e.u8(2)?;
            set.encode(e, ctx)?;
        }
        if let Some(set) = &self.plutus_v1_script {
            e.u8(3)?;
            set.encode(e, ctx)?;
        }
        if let Some(set) = &self.plutus_data {
            e.u8(4)?;
            set.encode(e, ctx)?;
        }
        if !self.redeemer.is_empty() {
            e.u8(5)?;
            self.redeemer.encode(e, ctx)?;
        }
        if let Some(set) = &self.plutus_v2_script {
            e.u8(6)?;
            set.encode(e, ctx)?;
        }
        if let Some(set) = &self.plutus_v3_script {
            e.u8(7)?;
            set.encode(e, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_witness_set_roundtrips() {
        let ws = WitnessSet::default();
        let cbor = minicbor::to_vec(&ws).unwrap();
        let back: WitnessSet = minicbor::decode(&cbor).unwrap();
        assert_eq!(ws, back);
    }

    #[test]
    fn vkey_witness_roundtrips() {
        let mut ws = WitnessSet::default();
        ws.vkeywitness = Some(Set::new(vec![VKeyWitness {
            vkey: Bytes::from(vec![1; 32]),
            signature: Bytes::from(vec![2; 64]),
        }]));
        let cbor = minicbor::to_vec(&ws).unwrap();
        let back: WitnessSet = minicbor::decode(&cbor).unwrap();
        assert_eq!(ws, back);
    }

    #[test]
    fn plutus_data_set_preserves_non_canonical_member_bytes() {
        // `field 4` (`plutus_data`), tag 258, one element: a plutus-data
        // integer `1` encoded as a non-minimal 5-byte uint rather than the
        // canonical 1-byte form. A witness set that re-serializes its
        // plutus-data set canonically would change these bytes (and thus
        // the script-data hash); `KeepRaw` must reproduce them exactly.
        let non_minimal_one = [0x1a, 0x00, 0x00, 0x00, 0x01];
        let mut cbor = vec![0xa1, 0x04, 0xd9, 0x01, 0x02, 0x81];
        cbor.extend_from_slice(&non_minimal_one);

        let ws: WitnessSet = minicbor::decode(&cbor).unwrap();
        let plutus_data = ws.plutus_data.as_ref().unwrap();
        assert_eq!(plutus_data.len(), 1);
        let member = plutus_data.iter().next().unwrap();
        assert_eq!(**member, PlutusData::BigInt(cardano_codec::bigint::BigInt::from_i128(1)));
        assert_eq!(member.raw_cbor(), &non_minimal_one);

        let re_encoded = minicbor::to_vec(&ws).unwrap();
        assert_eq!(re_encoded, cbor);
    }

    #[test]
    fn native_script_built_programmatically_round_trips() {
        let script = NativeScript::InvalidBefore(100);
        let mut ws = WitnessSet::default();
        ws.native_script = Some(Set::new(vec![KeepRaw::new(script.clone())]));
        let cbor = minicbor::to_vec(&ws).unwrap();
        let back: WitnessSet = minicbor::decode(&cbor).unwrap();
        assert_eq!(ws, back);
        assert_eq!(**back.native_script.unwrap().iter().next().unwrap(), script);
    }

    #[test]
    fn tagged_set_form_round_trips() {
        let mut ws = WitnessSet::default();
        ws.vkeywitness = Some(Set::with_tagged(
            vec![VKeyWitness {
                vkey: Bytes::from(vec![9; 32]),
                signature: Bytes::from(vec![8; 64]),
            }],
            true,
        ));
        let cbor = minicbor::to_vec(&ws).unwrap();
        let back: WitnessSet = minicbor::decode(&cbor).unwrap();
        assert!(back.vkeywitness.unwrap().is_tagged());
    }
}
