//! Plutus data: the recursive tagged union carried by datums and redeemers.
//!
//! Grounded on the CBOR tag dispatch used for Plutus data across the
//! ecosystem: `Constr` (tags 121-127, 1280-1400, or 102 + explicit index),
//! `Map`, `BigInt` (plain int or tag 2/3 bignum), and bounded byte strings
//! that chunk into indefinite byte strings above 64 bytes rather than
//! rejecting (unlike `Metadatum`, whose wire format forbids chunking).

use cardano_codec::bigint::BigInt;
use minicbor::data::Tag;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub const BOUNDED_BYTES_CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constr<A> {
    pub tag: u64,
    pub fields: Vec<A>,
}

impl<A> Constr<A> {
    fn alternative_tag(&self) -> (u64, Option<u64>) {
        match self.tag {
            0..=6 => (121 + self.tag, None),
            7..=127 => (1280 + (self.tag - 7), None),
            other => (102, Some(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlutusData {
    Constr(Constr<PlutusData>),
    Map(Vec<(PlutusData, PlutusData)>),
    BigInt(BigInt),
    BoundedBytes(Vec<u8>),
    Array(Vec<PlutusData>),
}

impl<'b, C> Decode<'b, C> for PlutusData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Tag => {
                let tag = d.tag()?.as_u64();
                match tag {
                    2 | 3 => {
                        let bytes = d.bytes()?.to_vec();
                        let magnitude = cardano_codec::bigint_from_bytes(&bytes, tag == 3);
                        Ok(PlutusData::BigInt(magnitude))
                    }
                    121..=127 | 1280..=1400 => {
                        let index = if tag <= 127 { tag - 121 } else { tag - 1280 + 7 };
                        let fields: Vec<PlutusData> = d.decode_with(ctx)?;
                        Ok(PlutusData::Constr(Constr { tag: index, fields }))
                    }
                    102 => {
                        let array_len = d.array()?;
                        if array_len != Some(2) {
                            return Err(DecodeError::message(
                                "expected a 2-element array for tag 102 constr",
                            ));
                        }
                        let tag: u64 = d.decode_with(ctx)?;
                        let fields: Vec<PlutusData> = d.decode_with(ctx)?;
                        Ok(PlutusData::Constr(Constr { tag, fields }))
                    }
                    24 => {
                        let bytes = d.bytes()?.to_vec();
                        minicbor::decode_with(&bytes, ctx)
                    }
                    other => Err(DecodeError::message(format!(
                        "unexpected tag {other} decoding plutus data"
                    ))),
                }
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
                Ok(PlutusData::Map(entries))
            }
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                let items: Vec<PlutusData> = d.decode_with(ctx)?;
                Ok(PlutusData::Array(items))
            }
            minicbor::data::Type::Bytes | minicbor::data::Type::BytesIndef => {
                Ok(PlutusData::BoundedBytes(d.bytes()?.to_vec()))
            }
            _ => Ok(PlutusData::BigInt(d.decode_with(ctx)?)),
        }
    }
}

impl<C> Encode<C> for PlutusData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            PlutusData::Constr(constr) => {
                let (tag, explicit) = constr.alternative_tag();
                e.tag(Tag::new(tag))?;
                if let Some(explicit) = explicit {
                    e.array(2)?;
                    e.u64(explicit)?;
                }
                e.array(constr.fields.len() as u64)?;
                for field in &constr.fields {
                    field.encode(e, ctx)?;
                }
                Ok(())
            }
            PlutusData::Map(entries) => {
                e.map(entries.len() as u64)?;
                for (k, v) in entries {
                    k.encode(e, ctx)?;
                    v.encode(e, ctx)?;
                }
                Ok(())
            }
            PlutusData::BigInt(n) => n.encode(e, ctx),
            PlutusData::BoundedBytes(bytes) => encode_bounded_bytes(e, bytes),
            PlutusData::Array(items) => {
                e.array(items.len() as u64)?;
                for item in items {
                    item.encode(e, ctx)?;
                }
                Ok(())
            }
        }
    }
}

fn encode_bounded_bytes<W: minicbor::encode::Write>(
    e: &mut minicbor::Encoder<W>,
    bytes: &[u8],
) -> Result<(), minicbor::encode::Error<W::Error>> {
    if bytes.len() <= BOUNDED_BYTES_CHUNK_SIZE {
        e.bytes(bytes)?;
    } else {
        e.begin_bytes()?;
        for chunk in bytes.chunks(BOUNDED_BYTES_CHUNK_SIZE) {
            e.bytes(chunk)?;
        }
        e.end()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_constr_roundtrips() {
        let data = PlutusData::Constr(Constr {
            tag: 0,
            fields: vec![PlutusData::BigInt(BigInt::from_i128(1))],
        });
        let cbor = minicbor::to_vec(&data).unwrap();
        let back: PlutusData = minicbor::decode(&cbor).unwrap();
        assert_eq!(data, back);
    }

    #[test]
    fn bounded_bytes_chunks_over_64() {
        let data = PlutusData::BoundedBytes(vec![7u8; 100]);
        let cbor = minicbor::to_vec(&data).unwrap();
        let back: PlutusData = minicbor::decode(&cbor).unwrap();
        assert_eq!(data, back);
    }

    #[test]
    fn map_roundtrips() {
        let data = PlutusData::Map(vec![(
            PlutusData::BigInt(BigInt::from_i128(1)),
            PlutusData::BoundedBytes(vec![1, 2, 3]),
        )]);
        let cbor = minicbor::to_vec(&data).unwrap();
        let back: PlutusData = minicbor::decode(&cbor).unwrap();
        assert_eq!(data, back);
    }
}
