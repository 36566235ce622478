//! The value algebra and multi-asset model (spec components A + B).

mod asset_id;
mod asset_name;
mod multiasset;

pub use asset_id::{AssetId, AssetIdMap};
pub use asset_name::AssetName;
pub use multiasset::{AssetNameMap, MultiAsset};

use crate::error::{ChainError, ChainResult};
use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

/// 28-byte Blake2b-224 hash identifying a minting/native script.
pub type PolicyId = Hash<28>;

/// A transaction's native-currency amount, wire-unsigned (lovelace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coin(u64);

impl Coin {
    pub const ZERO: Coin = Coin(0);

    pub fn new(amount: u64) -> Self {
        Coin(amount)
    }

    pub fn amount(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, rhs: Coin) -> ChainResult<Coin> {
        self.0
            .checked_add(rhs.0)
            .map(Coin)
            .ok_or_else(|| ChainError::ArithmeticOverflow("coin addition".into()))
    }

    /// Signed subtraction, widened to i128 so a negative net value
    /// (used throughout balancing and diffing) is representable.
    pub fn diff(self, rhs: Coin) -> i128 {
        self.0 as i128 - rhs.0 as i128
    }
}

impl From<u64> for Coin {
    fn from(amount: u64) -> Self {
        Coin(amount)
    }
}

impl From<Coin> for u64 {
    fn from(coin: Coin) -> Self {
        coin.0
    }
}

impl<'b, C> Decode<'b, C> for Coin {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        Ok(Coin(d.decode_with(ctx)?))
    }
}

impl<C> Encode<C> for Coin {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u64(self.0)?;
        Ok(())
    }
}

/// A coin + multi-asset bundle. Asset amounts are carried as `i64`
/// internally so the value algebra (add/sub/positive/negative) can be
/// shared between `Value` (ledger-positive, what outputs hold) and `Mint`
/// (may carry negative entries), with callers enforcing positivity where
/// the wire format requires it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub coin: i128,
    pub assets: MultiAsset,
}

impl Value {
    pub fn coin_only(coin: u64) -> Self {
        Value {
            coin: coin as i128,
            assets: MultiAsset::default(),
        }
    }

    pub fn new(coin: i128, assets: MultiAsset) -> Self {
        Value { coin, assets }
    }

    /// Per-asset-id sum; entries whose resulting amount is zero are
    /// dropped (§4.2). Coin is summed separately and never elided.
    pub fn add(&self, other: &Value) -> ChainResult<Value> {
        let coin = self
            .coin
            .checked_add(other.coin)
            .ok_or_else(|| ChainError::ArithmeticOverflow("value addition (coin)".into()))?;
        let assets = self.assets.checked_add(&other.assets)?;
        Ok(Value { coin, assets })
    }

    pub fn sub(&self, other: &Value) -> ChainResult<Value> {
        let coin = self
            .coin
            .checked_sub(other.coin)
            .ok_or_else(|| ChainError::ArithmeticOverflow("value subtraction (coin)".into()))?;
        let assets = self.assets.checked_sub(&other.assets)?;
        Ok(Value { coin, assets })
    }

    pub fn is_zero(&self) -> bool {
        self.coin == 0 && self.assets.is_empty()
    }

    /// Projects out the subset of entries (coin and each asset-id) whose
    /// amount is strictly positive.
    pub fn positive(&self) -> Value {
        Value {
            coin: self.coin.max(0),
            assets: self.assets.filter(|amount| amount > 0),
        }
    }

    /// Projects out the subset of entries whose amount is strictly
    /// negative, with amounts kept in their original (negative) sign.
    pub fn negative(&self) -> Value {
        Value {
            coin: self.coin.min(0),
            assets: self.assets.filter(|amount| amount < 0),
        }
    }

    /// Downcasts to the wire-positive `Value` shape used by transaction
    /// outputs: fails if coin or any asset amount is negative or the coin
    /// does not fit a `u64`.
    pub fn to_wire_positive(&self) -> ChainResult<(Coin, MultiAsset)> {
        if self.coin < 0 {
            return Err(ChainError::InvalidArgument(
                "value has a negative coin amount".into(),
            ));
        }
        let coin = u64::try_from(self.coin)
            .map_err(|_| ChainError::ArithmeticOverflow("coin does not fit u64".into()))?;
        for (_, amount) in self.assets.iter_entries() {
            if amount < 0 {
                return Err(ChainError::InvalidArgument(
                    "value has a negative asset amount".into(),
                ));
            }
        }
        Ok((Coin(coin), self.assets.clone()))
    }
}

impl<'b, C> Decode<'b, C> for Value {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Array => {
                let len = d.array()?;
                let coin: u64 = d.decode_with(ctx)?;
                let assets: MultiAsset = d.decode_with(ctx)?;
                if let Some(len) = len {
                    if len != 2 {
                        return Err(DecodeError::message("value array must have length 2"));
                    }
                }
                Ok(Value {
                    coin: coin as i128,
                    assets,
                })
            }
            _ => {
                let coin: u64 = d.decode_with(ctx)?;
                Ok(Value::coin_only(coin))
            }
        }
    }
}

impl<C> Encode<C> for Value {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let coin = u64::try_from(self.coin).map_err(|_| {
            minicbor::encode::Error::message("value coin does not fit u64 on encode")
        })?;

        if self.assets.is_empty() {
            e.u64(coin)?;
        } else {
            e.array(2)?;
            e.u64(coin)?;
            self.assets.encode(e, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_name::AssetName;

    fn policy(byte: u8) -> PolicyId {
        PolicyId::new([byte; 28])
    }

    #[test]
    fn add_is_commutative_and_zero_elides() {
        let mut a = MultiAsset::default();
        a.insert(policy(1), AssetName::new(b"tok".to_vec()).unwrap(), 5);
        let va = Value::new(10, a);

        let mut b = MultiAsset::default();
        b.insert(policy(1), AssetName::new(b"tok".to_vec()).unwrap(), -5);
        let vb = Value::new(-10, b);

        let sum = va.add(&vb).unwrap();
        assert!(sum.is_zero());
    }

    #[test]
    fn sub_add_roundtrips() {
        let mut a = MultiAsset::default();
        a.insert(policy(1), AssetName::new(b"tok".to_vec()).unwrap(), 7);
        let va = Value::new(100, a);

        let mut b = MultiAsset::default();
        b.insert(policy(1), AssetName::new(b"tok".to_vec()).unwrap(), 3);
        let vb = Value::new(20, b);

        let back = va.add(&vb).unwrap().sub(&vb).unwrap();
        assert_eq!(back, va);
    }

    #[test]
    fn coin_only_encodes_as_plain_uint() {
        let v = Value::coin_only(42);
        let cbor = minicbor::to_vec(&v).unwrap();
        assert_eq!(cbor[0] >> 5, 0); // major type 0: unsigned int
    }
}
