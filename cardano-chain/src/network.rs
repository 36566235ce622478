//! `network_id` wire enum, distinguishing mainnet from every test network.

use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkId {
    Testnet,
    Mainnet,
}

impl<'b, C> Decode<'b, C> for NetworkId {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        match d.u8()? {
            0 => Ok(NetworkId::Testnet),
            1 => Ok(NetworkId::Mainnet),
            other => Err(DecodeError::message(format!("unknown network id {other}"))),
        }
    }
}

impl<C> Encode<C> for NetworkId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u8(match self {
            NetworkId::Testnet => 0,
            NetworkId::Mainnet => 1,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips() {
        for id in [NetworkId::Testnet, NetworkId::Mainnet] {
            let cbor = minicbor::to_vec(&id).unwrap();
            let back: NetworkId = minicbor::decode(&cbor).unwrap();
            assert_eq!(id, back);
        }
    }
}
