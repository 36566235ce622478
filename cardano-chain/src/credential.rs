//! Stake/governance credentials: a key hash or a script hash, shared by
//! certificates, withdrawals, voters and governance actions (spec §4.5
//! step 4: "the credential being operated on (when key-hash)").

use crate::native_script::{AddrKeyhash, ScriptHash};
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StakeCredential {
    AddrKeyhash(AddrKeyhash),
    ScriptHash(ScriptHash),
}

impl StakeCredential {
    /// The key hash this credential resolves to, if it is a key (not
    /// script) credential — used by unique-signer derivation (§4.5).
    pub fn key_hash(&self) -> Option<&AddrKeyhash> {
        match self {
            StakeCredential::AddrKeyhash(hash) => Some(hash),
            StakeCredential::ScriptHash(_) => None,
        }
    }
}

impl<'b, C> Decode<'b, C> for StakeCredential {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let credential = match variant {
            0 => StakeCredential::AddrKeyhash(d.decode_with(ctx)?),
            1 => StakeCredential::ScriptHash(d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::message(format!(
                    "unknown stake credential variant {other}"
                )))
            }
        };
        Ok(credential)
    }
}

impl<C> Encode<C> for StakeCredential {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        match self {
            StakeCredential::AddrKeyhash(hash) => {
                e.u8(0)?;
                hash.encode(e, ctx)?;
            }
            StakeCredential::ScriptHash(hash) => {
                e.u8(1)?;
                hash.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

/// Credential carried by a DRep registration/update/retirement certificate.
pub type DRepCredential = StakeCredential;
/// Credential identifying a constitutional committee member's cold key.
pub type CommitteeColdCredential = StakeCredential;
/// Credential identifying a constitutional committee member's hot key.
pub type CommitteeHotCredential = StakeCredential;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_hash_roundtrips() {
        let cred = StakeCredential::AddrKeyhash(AddrKeyhash::new([9u8; 28]));
        let cbor = minicbor::to_vec(&cred).unwrap();
        let back: StakeCredential = minicbor::decode(&cbor).unwrap();
        assert_eq!(cred, back);
        assert!(back.key_hash().is_some());
    }

    #[test]
    fn script_hash_has_no_key_hash() {
        let cred = StakeCredential::ScriptHash(ScriptHash::new([1u8; 28]));
        assert!(cred.key_hash().is_none());
    }
}
