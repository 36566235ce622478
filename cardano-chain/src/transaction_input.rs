//! A reference to a previous transaction's output (spec §4.1 Component A).
//! Grounded on `pallas_primitives::alonzo::TransactionInput`; the index
//! field is `u32` here (spec §3.1), narrower than the teacher's `u64`.

use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type TransactionId = Hash<32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionInput {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionInput {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        TransactionInput {
            transaction_id,
            index,
        }
    }
}

impl<'b, C> Decode<'b, C> for TransactionInput {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(TransactionInput {
            transaction_id: d.decode_with(ctx)?,
            index: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for TransactionInput {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.transaction_id.encode(e, ctx)?;
        self.index.encode(e, ctx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips() {
        let input = TransactionInput::new(TransactionId::new([3u8; 32]), 2);
        let cbor = minicbor::to_vec(&input).unwrap();
        let back: TransactionInput = minicbor::decode(&cbor).unwrap();
        assert_eq!(input, back);
    }

    #[test]
    fn sorts_by_transaction_id_then_index() {
        let a = TransactionInput::new(TransactionId::new([1u8; 32]), 5);
        let b = TransactionInput::new(TransactionId::new([1u8; 32]), 2);
        let c = TransactionInput::new(TransactionId::new([2u8; 32]), 0);
        let mut inputs = vec![a, b, c];
        inputs.sort();
        assert_eq!(inputs, vec![b, a, c]);
    }
}
