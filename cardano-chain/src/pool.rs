//! Stake pool relay/metadata types embedded in `Certificate::PoolRegistration`.
//! Grounded on `pallas_primitives::alonzo::{Relay, PoolMetadata}`.

use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type PoolMetadataHash = Hash<32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetadata {
    pub url: String,
    pub hash: PoolMetadataHash,
}

impl<'b, C> Decode<'b, C> for PoolMetadata {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(PoolMetadata {
            url: d.decode_with(ctx)?,
            hash: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for PoolMetadata {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.url.encode(e, ctx)?;
        self.hash.encode(e, ctx)?;
        Ok(())
    }
}

pub type Port = u16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relay {
    SingleHostAddr(Option<Port>, Option<[u8; 4]>, Option<[u8; 16]>),
    SingleHostName(Option<Port>, String),
    MultiHostName(String),
}

impl<'b, C> Decode<'b, C> for Relay {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let relay = match variant {
            0 => Relay::SingleHostAddr(
                d.decode_with(ctx)?,
                decode_ipv4(d)?,
                decode_ipv6(d)?,
            ),
            1 => Relay::SingleHostName(d.decode_with(ctx)?, d.decode_with(ctx)?),
            2 => Relay::MultiHostName(d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::message(format!("unknown relay variant {other}")))
            }
        };
        Ok(relay)
    }
}

fn decode_ipv4(d: &mut minicbor::Decoder<'_>) -> Result<Option<[u8; 4]>, DecodeError> {
    match d.datatype()? {
        minicbor::data::Type::Null => {
            d.null()?;
            Ok(None)
        }
        _ => {
            let bytes = d.bytes()?;
            bytes
                .try_into()
                .map(Some)
                .map_err(|_| DecodeError::message("expected 4 bytes for ipv4 relay address"))
        }
    }
}

fn decode_ipv6(d: &mut minicbor::Decoder<'_>) -> Result<Option<[u8; 16]>, DecodeError> {
    match d.datatype()? {
        minicbor::data::Type::Null => {
            d.null()?;
            Ok(None)
        }
        _ => {
            let bytes = d.bytes()?;
            bytes
                .try_into()
                .map(Some)
                .map_err(|_| DecodeError::message("expected 16 bytes for ipv6 relay address"))
        }
    }
}

impl<C> Encode<C> for Relay {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Relay::SingleHostAddr(port, ipv4, ipv6) => {
                e.array(4)?;
                e.u8(0)?;
                e.encode_with(port, ctx)?;
                match ipv4 {
                    Some(bytes) => {
                        e.bytes(bytes)?;
                    }
                    None => {
                        e.null()?;
                    }
                }
                match ipv6 {
                    Some(bytes) => {
                        e.bytes(bytes)?;
                    }
                    None => {
                        e.null()?;
                    }
                }
            }
            Relay::SingleHostName(port, name) => {
                e.array(3)?;
                e.u8(1)?;
                e.encode_with(port, ctx)?;
                e.str(name)?;
            }
            Relay::MultiHostName(name) => {
                e.array(2)?;
                e.u8(2)?;
                e.str(name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_host_name_roundtrips() {
        let relay = Relay::SingleHostName(Some(3001), "relay.example.com".into());
        let cbor = minicbor::to_vec(&relay).unwrap();
        let back: Relay = minicbor::decode(&cbor).unwrap();
        assert_eq!(relay, back);
    }

    #[test]
    fn single_host_addr_roundtrips_with_nulls() {
        let relay = Relay::SingleHostAddr(None, None, None);
        let cbor = minicbor::to_vec(&relay).unwrap();
        let back: Relay = minicbor::decode(&cbor).unwrap();
        assert_eq!(relay, back);
    }
}
