//! Deterministic CBOR encoding kernel shared by every Cardano ledger entity.
//!
//! This crate owns nothing era-specific. It provides the primitive wire
//! types (`Bytes`, `Int`, `BigInt`, `Set`, `NonEmptySet`, `KeepRaw`, ...) and
//! the breadcrumb-carrying error type that every codec in `cardano-chain`
//! builds on, following RFC 8949 §4.2's deterministic encoding rules plus
//! the Cardano-specific conventions (tag 258 sets, bounded bytes chunking).

pub use minicbor;

#[cfg(feature = "bigint")]
pub mod bigint;
pub mod error;
pub mod set;
pub mod utils;

pub use error::{CodecError, CodecResult};
#[cfg(feature = "bigint")]
pub use bigint::from_tagged_bytes as bigint_from_bytes;

/// Anything that can be losslessly round-tripped to/from a CBOR byte string
/// using the unit decoding context. Mirrors `pallas_codec::Fragment`.
pub trait Fragment: Sized + for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> {
    fn encode_fragment(&self) -> CodecResult<Vec<u8>> {
        minicbor::to_vec(self).map_err(|e| CodecError::Encoding(e.to_string()))
    }

    fn decode_fragment(bytes: &[u8]) -> CodecResult<Self> {
        minicbor::decode(bytes).map_err(|e| CodecError::Decoding {
            breadcrumb: "decode_fragment".into(),
            source: e.to_string(),
        })
    }
}

impl<T> Fragment for T where T: for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> {}

/// Serialized byte size of any encodable value, used by the fee
/// computation (§4.6) to size the transaction without a second pass.
pub fn encoded_len<T>(value: &T) -> CodecResult<usize>
where
    T: minicbor::Encode<()>,
{
    minicbor::to_vec(value)
        .map(|v| v.len())
        .map_err(|e| CodecError::Encoding(e.to_string()))
}
