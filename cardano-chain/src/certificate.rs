//! Shelley-through-Conway certificates carried in the transaction body's
//! certificate list (spec §4.1 Component D). Grounded on
//! `pallas_primitives::conway::Certificate` — variant indices 5 and 6
//! (Shelley's `MoveInstantaneousRewardsCert`) are gone, matching the
//! conway-era wire format this crate targets.

use crate::credential::{CommitteeColdCredential, CommitteeHotCredential, DRepCredential, StakeCredential};
use crate::governance::{Anchor, DRep, Epoch, RewardAccount};
use crate::native_script::AddrKeyhash;
use crate::pool::{PoolMetadata, Relay};
use crate::rational::UnitInterval;
use crate::value::Coin;
use cardano_codec::set::Set;
use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type PoolKeyhash = Hash<28>;
pub type VrfKeyhash = Hash<32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certificate {
    StakeRegistration(StakeCredential),
    StakeDeregistration(StakeCredential),
    StakeDelegation(StakeCredential, PoolKeyhash),
    PoolRegistration {
        operator: PoolKeyhash,
        vrf_keyhash: VrfKeyhash,
        pledge: Coin,
        cost: Coin,
        margin: UnitInterval,
        reward_account: RewardAccount,
        pool_owners: Set<AddrKeyhash>,
        relays: Vec<Relay>,
        pool_metadata: Option<PoolMetadata>,
    },
    PoolRetirement(PoolKeyhash, Epoch),
    Reg(StakeCredential, Coin),
    UnReg(StakeCredential, Coin),
    VoteDeleg(StakeCredential, DRep),
    StakeVoteDeleg(StakeCredential, PoolKeyhash, DRep),
    StakeRegDeleg(StakeCredential, PoolKeyhash, Coin),
    VoteRegDeleg(StakeCredential, DRep, Coin),
    StakeVoteRegDeleg(StakeCredential, PoolKeyhash, DRep, Coin),
    AuthCommitteeHot(CommitteeColdCredential, CommitteeHotCredential),
    ResignCommitteeCold(CommitteeColdCredential, Option<Anchor>),
    RegDRepCert(DRepCredential, Coin, Option<Anchor>),
    UnRegDRepCert(DRepCredential, Coin),
    UpdateDRepCert(DRepCredential, Option<Anchor>),
}

impl Certificate {
    fn variant(&self) -> u8 {
        match self {
            Certificate::StakeRegistration(_) => 0,
            Certificate::StakeDeregistration(_) => 1,
            Certificate::StakeDelegation(..) => 2,
            Certificate::PoolRegistration { .. } => 3,
            Certificate::PoolRetirement(..) => 4,
            Certificate::Reg(..) => 7,
            Certificate::UnReg(..) => 8,
            Certificate::VoteDeleg(..) => 9,
            Certificate::StakeVoteDeleg(..) => 10,
            Certificate::StakeRegDeleg(..) => 11,
            Certificate::VoteRegDeleg(..) => 12,
            Certificate::StakeVoteRegDeleg(..) => 13,
            Certificate::AuthCommitteeHot(..) => 14,
            Certificate::ResignCommitteeCold(..) => 15,
            Certificate::RegDRepCert(..) => 16,
            Certificate::UnRegDRepCert(..) => 17,
            Certificate::UpdateDRepCert(..) => 18,
        }
    }

    /// The stake/voting credential this certificate operates on, if any —
    /// every variant except the pool ones and the committee cert targets a
    /// `StakeCredential`-shaped hash, used by unique-signer derivation
    /// (spec §4.5).
    pub fn credential(&self) -> Option<&StakeCredential> {
        match self {
            Certificate::StakeRegistration(c)
            | Certificate::StakeDeregistration(c)
            | Certificate::StakeDelegation(c, _)
            | Certificate::Reg(c, _)
            | Certificate::UnReg(c, _)
            | Certificate::VoteDeleg(c, _)
            | Certificate::StakeVoteDeleg(c, ..)
            | Certificate::StakeRegDeleg(c, ..)
            | Certificate::VoteRegDeleg(c, ..)
            | Certificate::StakeVoteRegDeleg(c, ..)
            | Certificate::RegDRepCert(c, ..)
            | Certificate::UnRegDRepCert(c, ..)
            | Certificate::UpdateDRepCert(c, ..)
            | Certificate::ResignCommitteeCold(c, ..) => Some(c),
            _ => None,
        }
    }

    /// Whether this certificate requires its credential's witness even when
    /// the credential is being deregistered/retired (the deposit-reclaiming
    /// certs still need the owner's signature).
    pub fn requires_credential_witness(&self) -> bool {
        !matches!(self, Certificate::PoolRegistration { .. })
    }
}

impl<'b, C> Decode<'b, C> for Certificate {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let len = d.array()?;
        let variant = d.u8()?;
        let cert = match variant {
            0 => Certificate::StakeRegistration(d.decode_with(ctx)?),
            1 => Certificate::StakeDeregistration(d.decode_with(ctx)?),
            2 => Certificate::StakeDelegation(d.decode_with(ctx)?, d.decode_with(ctx)?),
            3 => Certificate::PoolRegistration {
                operator: d.decode_with(ctx)?,
                vrf_keyhash: d.decode_with(ctx)?,
                pledge: d.decode_with(ctx)?,
                cost: d.decode_with(ctx)?,
                margin: d.decode_with(ctx)?,
                reward_account: d.decode_with(ctx)?,
                pool_owners: d.decode_with(ctx)?,
                relays: d.decode_with(ctx)?,
                pool_metadata: d.decode_with(ctx)?,
            },
            4 => Certificate::PoolRetirement(d.decode_with(ctx)?, d.decode_with(ctx)?),
            7 => Certificate::Reg(d.decode_with(ctx)?, d.decode_with(ctx)?),
            8 => Certificate::UnReg(d.decode_with(ctx)?, d.decode_with(ctx)?),
            9 => Certificate::VoteDeleg(d.decode_with(ctx)?, d.decode_with(ctx)?),
            10 => Certificate::StakeVoteDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            11 => Certificate::StakeRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            12 => Certificate::VoteRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            13 => Certificate::StakeVoteRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            14 => Certificate::AuthCommitteeHot(d.decode_with(ctx)?, d.decode_with(ctx)?),
            15 => Certificate::ResignCommitteeCold(d.decode_with(ctx)?, d.decode_with(ctx)?),
            16 => Certificate::RegDRepCert(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            17 => Certificate::UnRegDRepCert(d.decode_with(ctx)?, d.decode_with(ctx)?),
            18 => Certificate::UpdateDRepCert(d.decode_with(ctx)?, d.decode_with(ctx)?),
            other => {
                return Err(DecodeError::message(format!(
                    "unknown certificate variant {other}"
                )))
            }
        };
        let _ = len;
        Ok(cert)
    }
}

impl<C> Encode<C> for Certificate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Certificate::StakeRegistration(cred) | Certificate::StakeDeregistration(cred) => {
                e.array(2)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
            }
            Certificate::StakeDelegation(cred, pool) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                pool.encode(e, ctx)?;
            }
            Certificate::PoolRegistration {
                operator,
                vrf_keyhash,
                pledge,
                cost,
                margin,
                reward_account,
                pool_owners,
                relays,
                pool_metadata,
            } => {
                e.array(10)?;
                e.u8(self.variant())?;
                operator.encode(e, ctx)?;
                vrf_keyhash.encode(e, ctx)?;
                pledge.encode(e, ctx)?;
                cost.encode(e, ctx)?;
                margin.encode(e, ctx)?;
                reward_account.encode(e, ctx)?;
                pool_owners.encode(e, ctx)?;
                e.encode_with(relays, ctx)?;
                pool_metadata.encode(e, ctx)?;
            }
            Certificate::PoolRetirement(pool, epoch) => {
                e.array(3)?;
                e.u8(self.variant())?;
                pool.encode(e, ctx)?;
                epoch.encode(e, ctx)?;
            }
            Certificate::Reg(cred, coin) | Certificate::UnReg(cred, coin) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                coin.encode(e, ctx)?;
            }
            Certificate::VoteDeleg(cred, drep) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                drep.encode(e, ctx)?;
            }
            Certificate::StakeVoteDeleg(cred, pool, drep) => {
                e.array(4)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                pool.encode(e, ctx)?;
                drep.encode(e, ctx)?;
            }
            Certificate::StakeRegDeleg(cred, pool, coin) => {
                e.array(4)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                pool.encode(e, ctx)?;
                coin.encode(e, ctx)?;
            }
            Certificate::VoteRegDeleg(cred, drep, coin) => {
                e.array(4)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                drep.encode(e, ctx)?;
                coin.encode(e, ctx)?;
            }
            Certificate::StakeVoteRegDeleg(cred, pool, drep, coin) => {
                e.array(5)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                pool.encode(e, ctx)?;
                drep.encode(e, ctx)?;
                coin.encode(e, ctx)?;
            }
            Certificate::AuthCommitteeHot(cold, hot) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cold.encode(e, ctx)?;
                hot.encode(e, ctx)?;
            }
            Certificate::ResignCommitteeCold(cold, anchor) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cold.encode(e, ctx)?;
                anchor.encode(e, ctx)?;
            }
            Certificate::RegDRepCert(cred, coin, anchor) => {
                e.array(4)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                coin.encode(e, ctx)?;
                anchor.encode(e, ctx)?;
            }
            Certificate::UnRegDRepCert(cred, coin) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                coin.encode(e, ctx)?;
            }
            Certificate::UpdateDRepCert(cred, anchor) => {
                e.array(3)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
                anchor.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stake_registration_roundtrips() {
        let cert = Certificate::StakeRegistration(StakeCredential::AddrKeyhash(AddrKeyhash::new(
            [1u8; 28],
        )));
        let cbor = minicbor::to_vec(&cert).unwrap();
        let back: Certificate = minicbor::decode(&cbor).unwrap();
        assert_eq!(cert, back);
        assert!(back.credential().is_some());
    }

    #[test]
    fn pool_retirement_has_no_credential() {
        let cert = Certificate::PoolRetirement(PoolKeyhash::new([2u8; 28]), 500);
        assert!(cert.credential().is_none());
        assert!(cert.requires_credential_witness());
    }

    #[test]
    fn pool_registration_roundtrips() {
        let cert = Certificate::PoolRegistration {
            operator: PoolKeyhash::new([1u8; 28]),
            vrf_keyhash: VrfKeyhash::new([2u8; 32]),
            pledge: Coin::new(1_000_000),
            cost: Coin::new(340_000_000),
            margin: UnitInterval::new(1, 20),
            reward_account: RewardAccount::from(vec![0xe0, 1, 2, 3]),
            pool_owners: Set::new(vec![AddrKeyhash::new([3u8; 28])]),
            relays: vec![Relay::MultiHostName("relay.example.com".into())],
            pool_metadata: None,
        };
        let cbor = minicbor::to_vec(&cert).unwrap();
        let back: Certificate = minicbor::decode(&cbor).unwrap();
        assert_eq!(cert, back);
        assert!(!back.requires_credential_witness());
    }

    #[test]
    fn stake_vote_reg_deleg_roundtrips() {
        let cert = Certificate::StakeVoteRegDeleg(
            StakeCredential::AddrKeyhash(AddrKeyhash::new([9u8; 28])),
            PoolKeyhash::new([1u8; 28]),
            DRep::Abstain,
            Coin::new(2_000_000),
        );
        let cbor = minicbor::to_vec(&cert).unwrap();
        let back: Certificate = minicbor::decode(&cbor).unwrap();
        assert_eq!(cert, back);
    }
}
