//! Protocol parameter update payload (carried by `GovAction::ParameterChange`)
//! and the fully-populated snapshot a balancer caller supplies (spec §4.6).
//! Grounded on `pallas_primitives::conway::model::{ProtocolParamUpdate,
//! CostModels, PoolVotingThresholds, DRepVotingThresholds, ExUnitPrices}`.

use crate::governance::Epoch;
use crate::rational::{RationalNumber, UnitInterval};
use crate::redeemer::ExUnits;
use crate::value::Coin;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type CostModel = Vec<i64>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModels {
    pub plutus_v1: Option<CostModel>,
    pub plutus_v2: Option<CostModel>,
    pub plutus_v3: Option<CostModel>,
    #[serde(skip)]
    pub unknown: BTreeMap<u64, CostModel>,
}

impl<'b, C> Decode<'b, C> for CostModels {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let models: BTreeMap<u64, CostModel> = d.decode_with(ctx)?;
        let mut out = CostModels::default();
        for (k, v) in models {
            match k {
                0 => out.plutus_v1 = Some(v),
                1 => out.plutus_v2 = Some(v),
                2 => out.plutus_v3 = Some(v),
                other => {
                    out.unknown.insert(other, v);
                }
            }
        }
        Ok(out)
    }
}

impl<C> Encode<C> for CostModels {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let mut models: BTreeMap<u64, &CostModel> = BTreeMap::new();
        if let Some(m) = &self.plutus_v1 {
            models.insert(0, m);
        }
        if let Some(m) = &self.plutus_v2 {
            models.insert(1, m);
        }
        if let Some(m) = &self.plutus_v3 {
            models.insert(2, m);
        }
        for (k, v) in &self.unknown {
            models.insert(*k, v);
        }
        e.map(models.len() as u64)?;
        for (k, v) in models {
            k.encode(e, ctx)?;
            v.encode(e, ctx)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExUnitPrices {
    pub mem_price: RationalNumber,
    pub step_price: RationalNumber,
}

impl<'b, C> Decode<'b, C> for ExUnitPrices {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(ExUnitPrices {
            mem_price: d.decode_with(ctx)?,
            step_price: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for ExUnitPrices {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;
        self.mem_price.encode(e, ctx)?;
        self.step_price.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolVotingThresholds {
    pub motion_no_confidence: UnitInterval,
    pub committee_normal: UnitInterval,
    pub committee_no_confidence: UnitInterval,
    pub hard_fork_initiation: UnitInterval,
    pub security_voting_threshold: UnitInterval,
}

impl<'b, C> Decode<'b, C> for PoolVotingThresholds {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(PoolVotingThresholds {
            motion_no_confidence: d.decode_with(ctx)?,
            committee_normal: d.decode_with(ctx)?,
            committee_no_confidence: d.decode_with(ctx)?,
            hard_fork_initiation: d.decode_with(ctx)?,
            security_voting_threshold: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for PoolVotingThresholds {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(5)?;
        self.motion_no_confidence.encode(e, ctx)?;
        self.committee_normal.encode(e, ctx)?;
        self.committee_no_confidence.encode(e, ctx)?;
        self.hard_fork_initiation.encode(e, ctx)?;
        self.security_voting_threshold.encode(e, ctx)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DRepVotingThresholds {
    pub motion_no_confidence: UnitInterval,
    pub committee_normal: UnitInterval,
    pub committee_no_confidence: UnitInterval,
    pub update_constitution: UnitInterval,
    pub hard_fork_initiation: UnitInterval,
    pub pp_network_group: UnitInterval,
    pub pp_economic_group: UnitInterval,
    pub pp_technical_group: UnitInterval,
    pub pp_governance_group: UnitInterval,
    pub treasury_withdrawal: UnitInterval,
}

impl<'b, C> Decode<'b, C> for DRepVotingThresholds {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        d.array()?;
        Ok(DRepVotingThresholds {
            motion_no_confidence: d.decode_with(ctx)?,
            committee_normal: d.decode_with(ctx)?,
            committee_no_confidence: d.decode_with(ctx)?,
            update_constitution: d.decode_with(ctx)?,
            hard_fork_initiation: d.decode_with(ctx)?,
            pp_network_group: d.decode_with(ctx)?,
            pp_economic_group: d.decode_with(ctx)?,
            pp_technical_group: d.decode_with(ctx)?,
            pp_governance_group: d.decode_with(ctx)?,
            treasury_withdrawal: d.decode_with(ctx)?,
        })
    }
}

impl<C> Encode<C> for DRepVotingThresholds {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(10)?;
        self.motion_no_confidence.encode(e, ctx)?;
        self.committee_normal.encode(e, ctx)?;
        self.committee_no_confidence.encode(e, ctx)?;
        self.update_constitution.encode(e, ctx)?;
        self.hard_fork_initiation.encode(e, ctx)?;
        self.pp_network_group.encode(e, ctx)?;
        self.pp_economic_group.encode(e, ctx)?;
        self.pp_technical_group.encode(e, ctx)?;
        self.pp_governance_group.encode(e, ctx)?;
        self.treasury_withdrawal.encode(e, ctx)?;
        Ok(())
    }
}

/// The wire payload of `GovAction::ParameterChange`: a sparse map of
/// field-index to new value, only the changed parameters present. Field
/// numbers 5-6 and 12-15 are absent — those index positions belonged to
/// parameters retired before Conway (the d/extra-entropy/protocol-version
/// triad and the decentralization parameter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParamUpdate {
    pub minfee_a: Option<u64>,
    pub minfee_b: Option<u64>,
    pub max_block_body_size: Option<u64>,
    pub max_transaction_size: Option<u64>,
    pub max_block_header_size: Option<u64>,
    pub key_deposit: Option<Coin>,
    pub pool_deposit: Option<Coin>,
    pub maximum_epoch: Option<Epoch>,
    pub desired_number_of_stake_pools: Option<u64>,
    pub pool_pledge_influence: Option<RationalNumber>,
    pub expansion_rate: Option<UnitInterval>,
    pub treasury_growth_rate: Option<UnitInterval>,
    pub min_pool_cost: Option<Coin>,
    pub ada_per_utxo_byte: Option<Coin>,
    pub cost_models_for_script_languages: Option<CostModels>,
    pub execution_costs: Option<ExUnitPrices>,
    pub max_tx_ex_units: Option<ExUnits>,
    pub max_block_ex_units: Option<ExUnits>,
    pub max_value_size: Option<u64>,
    pub collateral_percentage: Option<u64>,
    pub max_collateral_inputs: Option<u64>,
    pub pool_voting_thresholds: Option<PoolVotingThresholds>,
    pub drep_voting_thresholds: Option<DRepVotingThresholds>,
    pub min_committee_size: Option<u64>,
    pub committee_term_limit: Option<Epoch>,
    pub governance_action_validity_period: Option<Epoch>,
    pub governance_action_deposit: Option<Coin>,
    pub drep_deposit: Option<Coin>,
    pub drep_inactivity_period: Option<Epoch>,
    pub minfee_refscript_cost_per_byte: Option<UnitInterval>,
}

macro_rules! encode_field {
    ($e:expr, $ctx:expr, $idx:expr, $field:expr) => {
        if let Some(value) = &$field {
            $e.u8($idx)?;
            value.encode($e, $ctx)?;
        }
    };
}

impl<'b, C> Decode<'b, C> for ProtocolParamUpdate {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut out = ProtocolParamUpdate::default();
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
                0 => out.minfee_a = Some(d.decode_with(ctx)?),
                1 => out.minfee_b = Some(d.decode_with(ctx)?),
                2 => out.max_block_body_size = Some(d.decode_with(ctx)?),
                3 => out.max_transaction_size = Some(d.decode_with(ctx)?),
                4 => out.max_block_header_size = Some(d.decode_with(ctx)?),
                5 => out.key_deposit = Some(d.decode_with(ctx)?),
                6 => out.pool_deposit = Some(d.decode_with(ctx)?),
                7 => out.maximum_epoch = Some(d.decode_with(ctx)?),
                8 => out.desired_number_of_stake_pools = Some(d.decode_with(ctx)?),
                9 => out.pool_pledge_influence = Some(d.decode_with(ctx)?),
                10 => out.expansion_rate = Some(d.decode_with(ctx)?),
                11 => out.treasury_growth_rate = Some(d.decode_with(ctx)?),
                16 => out.min_pool_cost = Some(d.decode_with(ctx)?),
                17 => out.ada_per_utxo_byte = Some(d.decode_with(ctx)?),
                18 => out.cost_models_for_script_languages = Some(d.decode_with(ctx)?),
                19 => out.execution_costs = Some(d.decode_with(ctx)?),
                20 => out.max_tx_ex_units = Some(d.decode_with(ctx)?),
                21 => out.max_block_ex_units = Some(d.decode_with(ctx)?),
                22 => out.max_value_size = Some(d.decode_with(ctx)?),
                23 => out.collateral_percentage = Some(d.decode_with(ctx)?),
                24 => out.max_collateral_inputs = Some(d.decode_with(ctx)?),
                25 => out.pool_voting_thresholds = Some(d.decode_with(ctx)?),
                26 => out.drep_voting_thresholds = Some(d.decode_with(ctx)?),
                27 => out.min_committee_size = Some(d.decode_with(ctx)?),
                28 => out.committee_term_limit = Some(d.decode_with(ctx)?),
                29 => out.governance_action_validity_period = Some(d.decode_with(ctx)?),
                30 => out.governance_action_deposit = Some(d.decode_with(ctx)?),
                31 => out.drep_deposit = Some(d.decode_with(ctx)?),
                32 => out.drep_inactivity_period = Some(d.decode_with(ctx)?),
                33 => out.minfee_refscript_cost_per_byte = Some(d.decode_with(ctx)?),
                other => {
                    return Err(DecodeError::message(format!(
                        "unknown protocol param update field {other}"
                    )))
                }
            }
        }
        Ok(out)
    }
}

impl<C> Encode<C> for ProtocolParamUpdate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let count = [
            self.minfee_a.is_some(),
            self.minfee_b.is_some(),
            self.max_block_body_size.is_some(),
            self.max_transaction_size.is_some(),
            self.max_block_header_size.is_some(),
            self.key_deposit.is_some(),
            self.pool_deposit.is_some(),
            self.maximum_epoch.is_some(),
            self.desired_number_of_stake_pools.is_some(),
            self.pool_pledge_influence.is_some(),
            self.expansion_rate.is_some(),
            self.treasury_growth_rate.is_some(),
            self.min_pool_cost.is_some(),
            self.ada_per_utxo_byte.is_some(),
            self.cost_models_for_script_languages.is_some(),
            self.execution_costs.is_some(),
            self.max_tx_ex_units.is_some(),
            self.max_block_ex_units.is_some(),
            self.max_value_size.is_some(),
            self.collateral_percentage.is_some(),
            self.max_collateral_inputs.is_some(),
            self.pool_voting_thresholds.is_some(),
            self.drep_voting_thresholds.is_some(),
            self.min_committee_size.is_some(),
            self.committee_term_limit.is_some(),
            self.governance_action_validity_period.is_some(),
            self.governance_action_deposit.is_some(),
            self.drep_deposit.is_some(),
            self.drep_inactivity_period.is_some(),
            self.minfee_refscript_cost_per_byte.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count() as u64;

        e.map(count)?;
        encode_field!(e, ctx, 0, self.minfee_a);
        encode_field!(e, ctx, 1, self.minfee_b);
        encode_field!(e, ctx, 2, self.max_block_body_size);
        encode_field!(e, ctx, 3, self.max_transaction_size);
        encode_field!(e, ctx, 4, self.max_block_header_size);
        encode_field!(e, ctx, 5, self.key_deposit);
        encode_field!(e, ctx, 6, self.pool_deposit);
        encode_field!(e, ctx, 7, self.maximum_epoch);
        encode_field!(e, ctx, 8, self.desired_number_of_stake_pools);
        encode_field!(e, ctx, 9, self.pool_pledge_influence);
        encode_field!(e, ctx, 10, self.expansion_rate);
        encode_field!(e, ctx, 11, self.treasury_growth_rate);
        encode_field!(e, ctx, 16, self.min_pool_cost);
        encode_field!(e, ctx, 17, self.ada_per_utxo_byte);
        encode_field!(e, ctx, 18, self.cost_models_for_script_languages);
        encode_field!(e, ctx, 19, self.execution_costs);
        encode_field!(e, ctx, 20, self.max_tx_ex_units);
        encode_field!(e, ctx, 21, self.max_block_ex_units);
        encode_field!(e, ctx, 22, self.max_value_size);
        encode_field!(e, ctx, 23, self.collateral_percentage);
        encode_field!(e, ctx, 24, self.max_collateral_inputs);
        encode_field!(e, ctx, 25, self.pool_voting_thresholds);
        encode_field!(e, ctx, 26, self.drep_voting_thresholds);
        encode_field!(e, ctx, 27, self.min_committee_size);
        encode_field!(e, ctx, 28, self.committee_term_limit);
        encode_field!(e, ctx, 29, self.governance_action_validity_period);
        encode_field!(e, ctx, 30, self.governance_action_deposit);
        encode_field!(e, ctx, 31, self.drep_deposit);
        encode_field!(e, ctx, 32, self.drep_inactivity_period);
        encode_field!(e, ctx, 33, self.minfee_refscript_cost_per_byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_models_roundtrip_preserves_unknown_languages() {
        let mut models = CostModels {
            plutus_v1: Some(vec![1, 2, 3]),
            plutus_v2: None,
            plutus_v3: Some(vec![4, 5]),
            unknown: BTreeMap::new(),
        };
        models.unknown.insert(9, vec![6, 7]);
        let cbor = minicbor::to_vec(&models).unwrap();
        let back: CostModels = minicbor::decode(&cbor).unwrap();
        assert_eq!(models, back);
    }

    #[test]
    fn sparse_update_roundtrips() {
        let update = ProtocolParamUpdate {
            minfee_a: Some(44),
            min_pool_cost: Some(Coin::new(340_000_000)),
            ..Default::default()
        };
        let cbor = minicbor::to_vec(&update).unwrap();
        let back: ProtocolParamUpdate = minicbor::decode(&cbor).unwrap();
        assert_eq!(update, back);
    }
}
