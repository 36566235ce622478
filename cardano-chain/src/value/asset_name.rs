use cardano_codec::CodecError;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const ASSET_NAME_MAX_LEN: usize = 32;

/// 0–32 bytes of arbitrary binary (not required to be UTF-8).
///
/// Ordered by (length, bytes) rather than plain lexicographic order — the
/// comparator `AssetNameMap` sorts by, matching the on-chain canonical
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct AssetName(Vec<u8>);

impl AssetName {
    pub fn new(bytes: Vec<u8>) -> Result<Self, CodecError> {
        if bytes.len() > ASSET_NAME_MAX_LEN {
            return Err(CodecError::OutOfBounds(format!(
                "asset name of {} bytes exceeds the {}-byte limit",
                bytes.len(),
                ASSET_NAME_MAX_LEN
            )));
        }
        Ok(AssetName(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for AssetName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for AssetName {
    type Error = CodecError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        AssetName::new(value)
    }
}

impl From<AssetName> for Vec<u8> {
    fn from(value: AssetName) -> Self {
        value.0
    }
}

impl PartialOrd for AssetName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssetName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl<'b, C> Decode<'b, C> for AssetName {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        let bytes = d.bytes()?;
        AssetName::new(bytes.to_vec()).map_err(|e| DecodeError::message(e.to_string()))
    }
}

impl<C> Encode<C> for AssetName {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_over_32_bytes() {
        assert!(AssetName::new(vec![0; 33]).is_err());
        assert!(AssetName::new(vec![0; 32]).is_ok());
    }

    #[test]
    fn orders_by_length_then_bytes() {
        let a = AssetName::new(b"zz".to_vec()).unwrap();
        let b = AssetName::new(b"aaa".to_vec()).unwrap();
        assert!(a < b);
    }
}
