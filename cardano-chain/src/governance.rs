//! Conway-era governance: DReps, voters, votes, anchors, and proposal/
//! governance-action payloads. Grounded on `pallas_primitives::conway::model`
//! (`DRep`, `Voter`, `Vote`, `Anchor`, `GovActionId`, `VotingProcedure`,
//! `ProposalProcedure`, `GovAction`, `Constitution`).

use crate::containers::InsertionOrderedMap;
use crate::credential::{CommitteeColdCredential, DRepCredential};
use crate::native_script::ScriptHash;
use crate::protocol_params::ProtocolParamUpdate;
use crate::value::Coin;
use cardano_codec::utils::Bytes;
use cardano_crypto::Hash;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type TransactionHash = Hash<32>;
pub type RewardAccount = Bytes;
pub type Anchor = AnchorInner;
pub type Epoch = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorInner {
    pub url: String,
    pub content_hash: Hash<32>,
}

impl<'b, C> Decode<'b, C> for AnchorInner {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(AnchorInner {
            url: d.decode_with(ctx)?,
            content_hash: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for AnchorInner {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.url.encode(e, ctx)?;
        self.content_hash.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    No,
    Yes,
    Abstain,
}

impl<'b, C> Decode<'b, C> for Vote {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        match d.u8()? {
            0 => Ok(Vote::No),
            1 => Ok(Vote::Yes),
            2 => Ok(Vote::Abstain),
            other => Err(DecodeError::message(format!("unknown vote {other}"))),
        }
    }
}

impl<C> Encode<C> for Vote {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u8(match self {
            Vote::No => 0,
            Vote::Yes => 1,
            Vote::Abstain => 2,
        })?;
        Ok(())
    }
}

/// Who cast a vote: a constitutional committee member (hot key or script),
/// a DRep (key or script), or an SPO (by cold key). Variant numbering and
/// ordering follow the conway model exactly, since `VotingProcedures` is a
/// canonically-sorted map keyed on this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Voter {
    ConstitutionalCommitteeKey(Hash<28>),
    ConstitutionalCommitteeScript(ScriptHash),
    DRepKey(Hash<28>),
    DRepScript(ScriptHash),
    StakePoolKey(Hash<28>),
}

impl Voter {
    fn variant(&self) -> u8 {
        match self {
            Voter::ConstitutionalCommitteeKey(_) => 0,
            Voter::ConstitutionalCommitteeScript(_) => 1,
            Voter::DRepKey(_) => 2,
            Voter::DRepScript(_) => 3,
            Voter::StakePoolKey(_) => 4,
        }
    }
}

impl<'b, C> Decode<'b, C> for Voter {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let voter = match variant {
            0 => Voter::ConstitutionalCommitteeKey(d.decode_with(ctx)?),
            1 => Voter::ConstitutionalCommitteeScript(d.decode_with(ctx)?),
            2 => Voter::DRepKey(d.decode_with(ctx)?),
            3 => Voter::DRepScript(d.decode_with(ctx)?),
            4 => Voter::StakePoolKey(d.decode_with(ctx)?),
            other => return Err(DecodeError::message(format!("unknown voter variant {other}"))),
        };
        Ok(voter)
    }
}

impl<C> Encode<C> for Voter {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        e.u8(self.variant())?;
        match self {
            Voter::ConstitutionalCommitteeKey(h) | Voter::DRepKey(h) | Voter::StakePoolKey(h) => {
                h.encode(e, ctx)?;
            }
            Voter::ConstitutionalCommitteeScript(h) | Voter::DRepScript(h) => {
                h.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GovActionId {
    pub transaction_id: TransactionHash,
    pub action_index: u32,
}

impl<'b, C> Decode<'b, C> for GovActionId {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(GovActionId {
            transaction_id: d.decode_with(ctx)?,
            action_index: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for GovActionId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.transaction_id.encode(e, ctx)?;
        self.action_index.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingProcedure {
    pub vote: Vote,
    pub anchor: Option<Anchor>,
}

impl<'b, C> Decode<'b, C> for VotingProcedure {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(VotingProcedure {
            vote: d.decode_with(ctx)?,
            anchor: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for VotingProcedure {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.vote.encode(e, ctx)?;
        self.anchor.encode(e, ctx)?;
        Ok(())
    }
}

/// The outer map is canonically sorted on `Voter`; the inner map preserves
/// the caller's insertion order and rejects a repeated `GovActionId` the
/// same way withdrawals reject a repeated reward address.
pub type VotingProcedures = BTreeMap<Voter, InsertionOrderedMap<GovActionId, VotingProcedure>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constitution {
    pub anchor: Anchor,
    pub guardrail_script: Option<ScriptHash>,
}

impl<'b, C> Decode<'b, C> for Constitution {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(Constitution {
            anchor: d.decode_with(ctx)?,
            guardrail_script: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for Constitution {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.anchor.encode(e, ctx)?;
        self.guardrail_script.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DRep {
    Key(DRepCredential),
    Script(ScriptHash),
    Abstain,
    NoConfidence,
}

impl DRep {
    fn variant(&self) -> u8 {
        match self {
            DRep::Key(_) => 0,
            DRep::Script(_) => 1,
            DRep::Abstain => 2,
            DRep::NoConfidence => 3,
        }
    }
}

impl<'b, C> Decode<'b, C> for DRep {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let drep = match variant {
            0 => DRep::Key(d.decode_with(ctx)?),
            1 => DRep::Script(d.decode_with(ctx)?),
            2 => DRep::Abstain,
            3 => DRep::NoConfidence,
            other => return Err(DecodeError::message(format!("unknown drep variant {other}"))),
        };
        Ok(drep)
    }
}

impl<C> Encode<C> for DRep {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            DRep::Key(cred) => {
                e.array(2)?;
                e.u8(self.variant())?;
                cred.encode(e, ctx)?;
            }
            DRep::Script(hash) => {
                e.array(2)?;
                e.u8(self.variant())?;
                hash.encode(e, ctx)?;
            }
            DRep::Abstain | DRep::NoConfidence => {
                e.array(1)?;
                e.u8(self.variant())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalProcedure {
    pub deposit: Coin,
    pub reward_account: RewardAccount,
    pub gov_action: GovAction,
    pub anchor: Anchor,
}

impl<'b, C> Decode<'b, C> for ProposalProcedure {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(ProposalProcedure {
            deposit: d.decode_with(ctx)?,
            reward_account: d.decode_with(ctx)?,
            gov_action: d.decode_with(ctx)?,
            anchor: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for ProposalProcedure {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(4)?;
        self.deposit.encode(e, ctx)?;
        self.reward_account.encode(e, ctx)?;
        self.gov_action.encode(e, ctx)?;
        self.anchor.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovAction {
    ParameterChange(
        Option<GovActionId>,
        Box<ProtocolParamUpdate>,
        Option<Hash<32>>,
    ),
    HardForkInitiation(Option<GovActionId>, (u64, u64)),
    TreasuryWithdrawals(BTreeMap<RewardAccount, Coin>, Option<Hash<32>>),
    NoConfidence(Option<GovActionId>),
    UpdateCommittee(
        Option<GovActionId>,
        Vec<CommitteeColdCredential>,
        BTreeMap<CommitteeColdCredential, Epoch>,
        crate::rational::UnitInterval,
    ),
    NewConstitution(Option<GovActionId>, Constitution),
    Information,
}

impl GovAction {
    fn variant(&self) -> u8 {
        match self {
            GovAction::ParameterChange(..) => 0,
            GovAction::HardForkInitiation(..) => 1,
            GovAction::TreasuryWithdrawals(..) => 2,
            GovAction::NoConfidence(_) => 3,
            GovAction::UpdateCommittee(..) => 4,
            GovAction::NewConstitution(..) => 5,
            GovAction::Information => 6,
        }
    }
}

impl<'b, C> Decode<'b, C> for GovAction {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        let variant = d.u8()?;
        let action = match variant {
            0 => GovAction::ParameterChange(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            1 => {
                let gov_id = d.decode_with(ctx)?;
                d.array()?;
                let major = d.decode_with(ctx)?;
                let minor = d.decode_with(ctx)?;
                GovAction::HardForkInitiation(gov_id, (major, minor))
            }
            2 => GovAction::TreasuryWithdrawals(d.decode_with(ctx)?, d.decode_with(ctx)?),
            3 => GovAction::NoConfidence(d.decode_with(ctx)?),
            4 => GovAction::UpdateCommittee(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            ),
            5 => GovAction::NewConstitution(d.decode_with(ctx)?, d.decode_with(ctx)?),
            6 => GovAction::Information,
            other => {
                return Err(DecodeError::message(format!(
                    "unknown gov action variant {other}"
                )))
            }
        };
        Ok(action)
    }
}

impl<C> Encode<C> for GovAction {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            GovAction::ParameterChange(gov_id, update, guardrail) => {
                e.array(4)?;
                e.u8(self.variant())?;
                gov_id.encode(e, ctx)?;
                update.encode(e, ctx)?;
                guardrail.encode(e, ctx)?;
            }
            GovAction::HardForkInitiation(gov_id, (major, minor)) => {
                e.array(3)?;
                e.u8(self.variant())?;
                gov_id.encode(e, ctx)?;
                e.array(2)?;
                major.encode(e, ctx)?;
                minor.encode(e, ctx)?;
            }
            GovAction::TreasuryWithdrawals(withdrawals, guardrail) => {
                e.array(3)?;
                e.u8(self.variant())?;
                withdrawals.encode(e, ctx)?;
                guardrail.encode(e, ctx)?;
            }
            GovAction::NoConfidence(gov_id) => {
                e.array(2)?;
                e.u8(self.variant())?;
                gov_id.encode(e, ctx)?;
            }
            GovAction::UpdateCommittee(gov_id, removed, added, threshold) => {
                e.array(5)?;
                e.u8(self.variant())?;
                gov_id.encode(e, ctx)?;
                removed.encode(e, ctx)?;
                added.encode(e, ctx)?;
                threshold.encode(e, ctx)?;
            }
            GovAction::NewConstitution(gov_id, constitution) => {
                e.array(3)?;
                e.u8(self.variant())?;
                gov_id.encode(e, ctx)?;
                constitution.encode(e, ctx)?;
            }
            GovAction::Information => {
                e.array(1)?;
                e.u8(self.variant())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voter_ordering_matches_variant_order() {
        let committee = Voter::ConstitutionalCommitteeKey(Hash::new([0u8; 28]));
        let drep = Voter::DRepKey(Hash::new([0u8; 28]));
        let pool = Voter::StakePoolKey(Hash::new([0u8; 28]));
        assert!(committee < drep);
        assert!(drep < pool);
    }

    #[test]
    fn no_confidence_roundtrips() {
        let action = GovAction::NoConfidence(Some(GovActionId {
            transaction_id: Hash::new([7u8; 32]),
            action_index: 0,
        }));
        let cbor = minicbor::to_vec(&action).unwrap();
        let back: GovAction = minicbor::decode(&cbor).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn information_roundtrips() {
        let cbor = minicbor::to_vec(&GovAction::Information).unwrap();
        let back: GovAction = minicbor::decode(&cbor).unwrap();
        assert_eq!(back, GovAction::Information);
    }

    #[test]
    fn drep_abstain_roundtrips() {
        let cbor = minicbor::to_vec(&DRep::Abstain).unwrap();
        let back: DRep = minicbor::decode(&cbor).unwrap();
        assert_eq!(back, DRep::Abstain);
    }
}
