//! A transaction output (spec §4.1 Component A). Grounded on
//! `pallas_primitives::babbage::PostAlonzoTransactionOutput` — the Conway
//! wire format's only shape; the Shelley/Mary/Alonzo array-encoded
//! `LegacyTransactionOutput` is dropped (see DESIGN.md).

use crate::plutus::PlutusData;
use crate::script::ScriptRef;
use crate::value::Value;
use cardano_codec::utils::{Bytes, CborWrap};
use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type Address = Bytes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatumOption {
    Hash(Hash<32>),
    Data(CborWrap<PlutusData>),
}

impl<'b, C> Decode<'b, C> for DatumOption {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let datum = match variant {
            0 => DatumOption::Hash(d.decode_with(ctx)?),
            1 => DatumOption::Data(d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::message(format!(
                    "unknown datum option variant {other}"
                )))
            }
        };
        Ok(datum)
    }
}

impl<C> Encode<C> for DatumOption {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        match self {
            DatumOption::Hash(hash) => {
                e.u8(0)?;
                hash.encode(e, ctx)?;
            }
            DatumOption::Data(data) => {
                e.u8(1)?;
                data.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub address: Address,
    pub value: Value,
    pub datum_option: Option<DatumOption>,
    pub script_ref: Option<ScriptRef>,
}

impl TransactionOutput {
    pub fn new(address: Address, value: Value) -> Self {
        TransactionOutput {
            address,
            value,
            datum_option: None,
            script_ref: None,
        }
    }
}

impl<'b, C> Decode<'b, C> for TransactionOutput {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut address = None;
        let mut value = None;
        let mut datum_option = None;
        let mut script_ref = None;

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
                0 => address = Some(d.decode_with(ctx)?),
                1 => value = Some(d.decode_with(ctx)?),
                2 => datum_option = Some(d.decode_with(ctx)?),
                3 => script_ref = Some(d.decode_with(ctx)?),
                other => {
                    return Err(DecodeError::message(format!(
                        "unknown transaction output field {other}"
                    )))
                }
            }
        }

        Ok(TransactionOutput {
            address: address
                .ok_or_else(|| DecodeError::message("transaction output missing address"))?,
            value: value.ok_or_else(|| DecodeError::message("transaction output missing value"))?,
            datum_option,
            script_ref,
        })
    }
}

impl<C> Encode<C> for TransactionOutput {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let len = 2 + self.datum_option.is_some() as u64 + self.script_ref.is_some() as u64;
        e.map(len)?;
        e.u8(0)?;
        self.address.encode(e, ctx)?;
        e.u8(1)?;
        self.value.encode(e, ctx)?;
        if let Some(datum) = &self.datum_option {
            e.u8(2)?;
            datum.encode(e, ctx)?;
        }
        if let Some(script_ref) = &self.script_ref {
            e.u8(3)?;
            script_ref.encode(e, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_output_roundtrips() {
        let output = TransactionOutput::new(Address::from(vec![0x60, 1, 2, 3]), Value::coin_only(1_500_000));
        let cbor = minicbor::to_vec(&output).unwrap();
        let back: TransactionOutput = minicbor::decode(&cbor).unwrap();
        assert_eq!(output, back);
    }

    #[test]
    fn output_with_datum_hash_roundtrips() {
        let mut output =
            TransactionOutput::new(Address::from(vec![0x60, 9, 9]), Value::coin_only(2_000_000));
        output.datum_option = Some(DatumOption::Hash(Hash::new([7u8; 32])));
        let cbor = minicbor::to_vec(&output).unwrap();
        let back: TransactionOutput = minicbor::decode(&cbor).unwrap();
        assert_eq!(output, back);
    }
}
