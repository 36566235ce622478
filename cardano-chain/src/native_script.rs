//! Native (multi-signature/time-lock) scripts, carried in the witness set
//! and hashed with a leading discriminant byte the same way Plutus scripts
//! are (§4.7 BuildConway script-hash convention, via `cardano-crypto`).

use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type AddrKeyhash = Hash<28>;
pub type ScriptHash = Hash<28>;

pub const NATIVE_SCRIPT_HASH_TAG: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NativeScript {
    ScriptPubkey(AddrKeyhash),
    ScriptAll(Vec<NativeScript>),
    ScriptAny(Vec<NativeScript>),
    ScriptNOfK(u32, Vec<NativeScript>),
    InvalidBefore(u64),
    InvalidHereafter(u64),
}

impl NativeScript {
    fn variant(&self) -> u32 {
        match self {
            NativeScript::ScriptPubkey(_) => 0,
            NativeScript::ScriptAll(_) => 1,
            NativeScript::ScriptAny(_) => 2,
            NativeScript::ScriptNOfK(..) => 3,
            NativeScript::InvalidBefore(_) => 4,
            NativeScript::InvalidHereafter(_) => 5,
        }
    }
}

impl<'b, C> Decode<'b, C> for NativeScript {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u32()?;
        let script = match variant {
            0 => NativeScript::ScriptPubkey(d.decode_with(ctx)?),
            1 => NativeScript::ScriptAll(d.decode_with(ctx)?),
            2 => NativeScript::ScriptAny(d.decode_with(ctx)?),
            3 => {
                let k = d.u32()?;
                let scripts = d.decode_with(ctx)?;
                NativeScript::ScriptNOfK(k, scripts)
            }
            4 => NativeScript::InvalidBefore(d.decode_with(ctx)?),
            5 => NativeScript::InvalidHereafter(d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::message(format!(
                    "unknown native script variant {other}"
                )))
            }
        };
        Ok(script)
    }
}

impl<C> Encode<C> for NativeScript {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            NativeScript::ScriptPubkey(hash) => {
                e.array(2)?;
                e.u32(self.variant())?;
                hash.encode(e, ctx)?;
            }
            NativeScript::ScriptAll(scripts) | NativeScript::ScriptAny(scripts) => {
                e.array(2)?;
                e.u32(self.variant())?;
                e.encode_with(scripts, ctx)?;
            }
            NativeScript::ScriptNOfK(k, scripts) => {
                e.array(3)?;
                e.u32(self.variant())?;
                e.u32(*k)?;
                e.encode_with(scripts, ctx)?;
            }
            NativeScript::InvalidBefore(slot) | NativeScript::InvalidHereafter(slot) => {
                e.array(2)?;
                e.u32(self.variant())?;
                e.u64(*slot)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_all_roundtrips() {
        let script = NativeScript::ScriptAll(vec![
            NativeScript::ScriptPubkey(AddrKeyhash::new([1u8; 28])),
            NativeScript::InvalidBefore(100),
        ]);
        let cbor = minicbor::to_vec(&script).unwrap();
        let back: NativeScript = minicbor::decode(&cbor).unwrap();
        assert_eq!(script, back);
    }

    #[test]
    fn n_of_k_roundtrips() {
        let script = NativeScript::ScriptNOfK(
            2,
            vec![
                NativeScript::ScriptPubkey(AddrKeyhash::new([1u8; 28])),
                NativeScript::ScriptPubkey(AddrKeyhash::new([2u8; 28])),
                NativeScript::ScriptPubkey(AddrKeyhash::new([3u8; 28])),
            ],
        );
        let cbor = minicbor::to_vec(&script).unwrap();
        let back: NativeScript = minicbor::decode(&cbor).unwrap();
        assert_eq!(script, back);
    }
}
