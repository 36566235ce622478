//! Plutus script bytes and the `script_ref` wrapper attached to outputs.

use crate::native_script::NativeScript;
use cardano_codec::utils::{Bytes, CborWrap};
use cardano_crypto::Hasher;
use minicbor::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Raw compiled Plutus bytecode for version `N` (1, 2 or 3), kept opaque —
/// this crate hashes and carries it but never evaluates it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlutusScript<const N: u8>(pub Bytes);

impl<const N: u8> PlutusScript<N> {
    /// Script hash: Blake2b-224 over a leading discriminant byte (1/2/3 for
    /// Plutus V1/V2/V3) followed by the raw script bytes, the convention
    /// used throughout the ledger for multi-language script hashing.
    pub fn hash(&self) -> cardano_crypto::Hash<28> {
        Hasher::<224>::hash_tagged(&self.0, N)
    }
}

impl<'b, C, const N: u8> Decode<'b, C> for PlutusScript<N> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(PlutusScript(d.decode_with(ctx)?))
    }
}

impl<C, const N: u8> Encode<C> for PlutusScript<N> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        self.0.encode(e, ctx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    Native(NativeScript),
    PlutusV1(PlutusScript<1>),
    PlutusV2(PlutusScript<2>),
    PlutusV3(PlutusScript<3>),
}

impl<'b, C> Decode<'b, C> for Script {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u8()?;
        let script = match variant {
            0 => Script::Native(d.decode_with(ctx)?),
            1 => Script::PlutusV1(d.decode_with(ctx)?),
            2 => Script::PlutusV2(d.decode_with(ctx)?),
            3 => Script::PlutusV3(d.decode_with(ctx)?),
            other => {
                return Err(minicbor::decode::Error::message(format!(
                    "unknown script_ref variant {other}"
                )))
            }
        };
        Ok(script)
    }
}

impl<C> Encode<C> for Script {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        match self {
            Script::Native(script) => {
                e.u8(0)?;
                script.encode(e, ctx)?;
            }
            Script::PlutusV1(script) => {
                e.u8(1)?;
                script.encode(e, ctx)?;
            }
            Script::PlutusV2(script) => {
                e.u8(2)?;
                script.encode(e, ctx)?;
            }
            Script::PlutusV3(script) => {
                e.u8(3)?;
                script.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

pub type ScriptRef = CborWrap<Script>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plutus_v2_hash_uses_tag_2() {
        let script = PlutusScript::<2>(Bytes::from(vec![1, 2, 3]));
        let hash = script.hash();
        assert_eq!(hash.as_ref().len(), 28);
    }

    #[test]
    fn script_roundtrips() {
        let script = Script::PlutusV2(PlutusScript(Bytes::from(vec![9, 9, 9])));
        let cbor = minicbor::to_vec(&script).unwrap();
        let back: Script = minicbor::decode(&cbor).unwrap();
        assert_eq!(script, back);
    }
}
