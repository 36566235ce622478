//! Shared fixtures for this crate's unit tests. Not part of the public API.

use cardano_chain::{
    CostModels, DRepVotingThresholds, ExUnitPrices, ExUnits, PoolVotingThresholds, RationalNumber,
    StakeCredential,
};

use crate::protocol_parameters::ProtocolParameters;
use crate::provider::CredentialResolver;

pub fn sample_protocol_parameters() -> ProtocolParameters {
    ProtocolParameters {
        minfee_a: 44,
        minfee_b: 155_381,
        max_tx_size: 16_384,
        max_block_body_size: 90_112,
        max_block_header_size: 1_100,
        key_deposit: 2_000_000,
        pool_deposit: 500_000_000,
        max_epoch: 18,
        desired_number_of_stake_pools: 500,
        pool_pledge_influence: 0.3,
        expansion_rate: 0.003,
        treasury_growth_rate: 0.2,
        min_pool_cost: 340_000_000,
        ada_per_utxo_byte: 4_310,
        cost_models: CostModels::default(),
        execution_costs: ExUnitPrices {
            mem_price: RationalNumber::new(577, 10_000),
            step_price: RationalNumber::new(721, 10_000_000),
        },
        max_tx_ex_units: ExUnits {
            mem: 14_000_000,
            steps: 10_000_000_000,
        },
        max_block_ex_units: ExUnits {
            mem: 62_000_000,
            steps: 20_000_000_000,
        },
        max_value_size: 5_000,
        collateral_percentage: 150,
        max_collateral_inputs: 3,
        pool_voting_thresholds: PoolVotingThresholds {
            motion_no_confidence: RationalNumber::new(51, 100),
            committee_normal: RationalNumber::new(51, 100),
            committee_no_confidence: RationalNumber::new(51, 100),
            hard_fork_initiation: RationalNumber::new(51, 100),
            security_voting_threshold: RationalNumber::new(51, 100),
        },
        drep_voting_thresholds: DRepVotingThresholds {
            motion_no_confidence: RationalNumber::new(67, 100),
            committee_normal: RationalNumber::new(67, 100),
            committee_no_confidence: RationalNumber::new(6, 10),
            update_constitution: RationalNumber::new(75, 100),
            hard_fork_initiation: RationalNumber::new(6, 10),
            pp_network_group: RationalNumber::new(67, 100),
            pp_economic_group: RationalNumber::new(67, 100),
            pp_technical_group: RationalNumber::new(67, 100),
            pp_governance_group: RationalNumber::new(75, 100),
            treasury_withdrawal: RationalNumber::new(67, 100),
        },
        min_committee_size: 7,
        committee_term_limit: 146,
        governance_action_validity_period: 6,
        governance_action_deposit: 100_000_000_000,
        drep_deposit: 500_000_000,
        drep_inactivity_period: 20,
        ref_script_cost_per_byte: 15.0,
    }
}

/// A `CredentialResolver` that never resolves anything, for tests that
/// don't exercise the address-credential seam.
pub struct NullCredentials;

impl CredentialResolver for NullCredentials {
    fn payment_credential(&self, _address: &cardano_chain::Address) -> Option<StakeCredential> {
        None
    }

    fn stake_credential(
        &self,
        _reward_account: &cardano_chain::RewardAccount,
    ) -> Option<StakeCredential> {
        None
    }
}
