//! Transaction metadata: a recursive tagged union whose bytes/text chunks
//! are bounded to 64 bytes and, unlike `PlutusData`'s `BoundedBytes`,
//! **rejected** rather than chunked when they exceed the limit — the
//! on-chain tx-metadata CDDL forbids splitting a single node's payload
//! across indefinite-length chunks (spec §4.3, §6, scenario S6).

use crate::error::ChainError;
use cardano_codec::bigint::BigInt;
use cardano_codec::utils::check_bounded_size;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type MetadatumLabel = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metadatum {
    Int(BigInt),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Metadatum>),
    Map(Vec<(Metadatum, Metadatum)>),
}

impl Metadatum {
    pub fn bytes(value: Vec<u8>) -> Result<Self, ChainError> {
        check_bounded_size(value.len())
            .map_err(|_| ChainError::InvalidMetadatumBoundedBytesSize {
                actual: value.len(),
                limit: cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT,
            })
            .map(|_| Metadatum::Bytes(value))
    }

    pub fn text(value: String) -> Result<Self, ChainError> {
        check_bounded_size(value.len())
            .map_err(|_| ChainError::InvalidMetadatumBoundedBytesSize {
                actual: value.len(),
                limit: cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT,
            })
            .map(|_| Metadatum::Text(value))
    }
}

impl<'b, C> Decode<'b, C> for Metadatum {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Bytes => Ok(Metadatum::Bytes(d.bytes()?.to_vec())),
            minicbor::data::Type::BytesIndef => {
                let mut buf = Vec::new();
                for chunk in d.bytes_iter()? {
                    let chunk = chunk?;
                    if chunk.len() > cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT {
                        return Err(DecodeError::message(
                            "metadatum bytes chunk exceeds the 64-byte limit",
                        ));
                    }
                    buf.extend_from_slice(chunk);
                }
                Ok(Metadatum::Bytes(buf))
            }
            minicbor::data::Type::String => Ok(Metadatum::Text(d.str()?.to_string())),
            minicbor::data::Type::StringIndef => {
                let mut buf = String::new();
                for chunk in d.str_iter()? {
                    let chunk = chunk?;
                    if chunk.len() > cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT {
                        return Err(DecodeError::message(
                            "metadatum text chunk exceeds the 64-byte limit",
                        ));
                    }
                    buf.push_str(chunk);
                }
                Ok(Metadatum::Text(buf))
            }
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                let items: Vec<Metadatum> = d.decode_with(ctx)?;
                Ok(Metadatum::List(items))
            }
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                let len = d.map()?;
                let mut entries = Vec::new();
                match len {
                    Some(len) => {
                        for _ in 0..len {
                            let k = d.decode_with(ctx)?;
                            let v = d.decode_with(ctx)?;
                            entries.push((k, v));
                        }
                    }
                    None => loop {
                        if d.datatype()? == minicbor::data::Type::Break {
                            d.skip()?;
                            break;
                        }
                        let k = d.decode_with(ctx)?;
                        let v = d.decode_with(ctx)?;
                        entries.push((k, v));
                    },
                }
                Ok(Metadatum::Map(entries))
            }
            _ => Ok(Metadatum::Int(d.decode_with(ctx)?)),
        }
    }
}

impl<C> Encode<C> for Metadatum {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Metadatum::Int(n) => n.encode(e, ctx),
            Metadatum::Bytes(bytes) => {
                if bytes.len() > cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT {
                    return Err(minicbor::encode::Error::message(
                        "metadatum bytes node exceeds the 64-byte on-chain limit",
                    ));
                }
                e.bytes(bytes)?;
                Ok(())
            }
            Metadatum::Text(text) => {
                if text.len() > cardano_codec::utils::METADATUM_BOUNDED_BYTES_LIMIT {
                    return Err(minicbor::encode::Error::message(
                        "metadatum text node exceeds the 64-byte on-chain limit",
                    ));
                }
                e.str(text)?;
                Ok(())
            }
            Metadatum::List(items) => {
                e.array(items.len() as u64)?;
                for item in items {
                    item.encode(e, ctx)?;
                }
                Ok(())
            }
            Metadatum::Map(entries) => {
                e.map(entries.len() as u64)?;
                for (k, v) in entries {
                    k.encode(e, ctx)?;
                    v.encode(e, ctx)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "json")]
impl Metadatum {
    /// Converts to a `serde_json::Value`, coercing map keys to `Text` as
    /// the wire format requires (a metadatum map key may be any variant,
    /// but JSON object keys must be strings).
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Metadatum::Int(n) => Value::String(n.inner().to_string()),
            Metadatum::Bytes(b) => Value::String(hex::encode(b)),
            Metadatum::Text(t) => Value::String(t.clone()),
            Metadatum::List(items) => Value::Array(items.iter().map(Metadatum::to_json).collect()),
            Metadatum::Map(entries) => {
                let map = entries
                    .iter()
                    .map(|(k, v)| (metadatum_key_to_string(k), v.to_json()))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

#[cfg(feature = "json")]
fn metadatum_key_to_string(key: &Metadatum) -> String {
    match key {
        Metadatum::Text(t) => t.clone(),
        Metadatum::Int(n) => n.inner().to_string(),
        Metadatum::Bytes(b) => hex::encode(b),
        other => serde_json::to_string(&other.to_json()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_node_of_64_encodes_fine() {
        assert!(Metadatum::bytes(vec![0u8; 64]).is_ok());
    }

    #[test]
    fn bytes_node_of_65_is_rejected() {
        let err = Metadatum::bytes(vec![0u8; 65]).unwrap_err();
        assert!(matches!(
            err,
            ChainError::InvalidMetadatumBoundedBytesSize { actual: 65, limit: 64 }
        ));
    }

    #[test]
    fn small_map_roundtrips() {
        let m = Metadatum::Map(vec![(
            Metadatum::text("k".into()).unwrap(),
            Metadatum::Int(BigInt::from_i128(1)),
        )]);
        let cbor = minicbor::to_vec(&m).unwrap();
        let back: Metadatum = minicbor::decode(&cbor).unwrap();
        assert_eq!(m, back);
    }
}
