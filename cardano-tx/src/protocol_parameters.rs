//! The fully-populated protocol parameter snapshot a balancer caller owns
//! (spec §3.3 `ProtocolParameters` row). Unlike `cardano_chain`'s
//! `ProtocolParamUpdate` — a sparse "what changed" payload carried inside a
//! `GovAction::ParameterChange` — every field here is mandatory, mirroring
//! how a provider's `get_parameters()` response is actually consumed: the
//! balancer reads `minfee_a`/`minfee_b`/`collateral_percentage`/etc.
//! unconditionally on every iteration (§4.6, §4.7).

use cardano_chain::{CostModels, DRepVotingThresholds, ExUnitPrices, ExUnits, PoolVotingThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    pub minfee_a: u64,
    pub minfee_b: u64,
    pub max_tx_size: u64,
    pub max_block_body_size: u64,
    pub max_block_header_size: u64,
    pub key_deposit: u64,
    pub pool_deposit: u64,
    pub max_epoch: u64,
    pub desired_number_of_stake_pools: u64,
    pub pool_pledge_influence: f64,
    pub expansion_rate: f64,
    pub treasury_growth_rate: f64,
    pub min_pool_cost: u64,
    pub ada_per_utxo_byte: u64,
    pub cost_models: CostModels,
    pub execution_costs: ExUnitPrices,
    pub max_tx_ex_units: ExUnits,
    pub max_block_ex_units: ExUnits,
    pub max_value_size: u64,
    pub collateral_percentage: u64,
    pub max_collateral_inputs: u64,
    pub pool_voting_thresholds: PoolVotingThresholds,
    pub drep_voting_thresholds: DRepVotingThresholds,
    pub min_committee_size: u64,
    pub committee_term_limit: u64,
    pub governance_action_validity_period: u64,
    pub governance_action_deposit: u64,
    pub drep_deposit: u64,
    pub drep_inactivity_period: u64,
    /// Price per reference-script byte, per-tier under the Conway surcharge
    /// curve (§4.6); the caller supplies the already-resolved tiers rather
    /// than the raw rational the governance action carries, since the
    /// balancer only ever needs the final per-byte prices.
    pub ref_script_cost_per_byte: f64,
}

#[cfg(test)]
mod tests {
    use crate::test_support::sample_protocol_parameters;

    #[test]
    fn sample_params_hold_sane_defaults() {
        let params = sample_protocol_parameters();
        assert_eq!(params.minfee_a, 44);
        assert_eq!(params.collateral_percentage, 150);
    }
}
