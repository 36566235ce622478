//! End-to-end balancer scenarios (spec §8 S1-S3). S4-S6 exercise
//! `cardano-chain`'s codec directly and live alongside the entities they
//! cover; these three need a full balancing session, which only exists in
//! this crate.

use cardano_chain::{
    AssetName, Coin, CostModels, DRepVotingThresholds, ExUnitPrices, ExUnits, MultiAsset,
    PlutusData, PolicyId, PoolVotingThresholds, RationalNumber, Redeemer, RedeemerTag, Redeemers,
    StakeCredential, TransactionBody, TransactionId, TransactionInput, TransactionOutput, Value,
    WitnessSet,
};
use cardano_codec::bigint::BigInt;
use cardano_codec::set::Set;
use cardano_codec::utils::Bytes;
use cardano_tx::provider::{CoinSelector, CredentialResolver, Evaluator, Utxo};
use cardano_tx::{balance, BalanceRequest, ProtocolParameters, SpendRedeemerBinding, TxError, TxResult};

fn sample_params() -> ProtocolParameters {
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
        max_tx_ex_units: ExUnits { mem: 14_000_000, steps: 10_000_000_000 },
        max_block_ex_units: ExUnits { mem: 62_000_000, steps: 20_000_000_000 },
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

struct NullCredentials;

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

struct NoopEvaluator;

impl Evaluator for NoopEvaluator {
    fn evaluate(&self, _body: &TransactionBody, _resolved: &[Utxo]) -> TxResult<Vec<Redeemer>> {
        Ok(vec![])
    }
}

fn sum_coin(utxos: &[Utxo]) -> i128 {
    utxos.iter().map(|u| u.output.value.coin).sum()
}

/// Greedy selector: keeps every preselected utxo, then draws from
/// `available` until the coin component of `target_value` is met.
struct GreedyAdaSelector;

impl CoinSelector for GreedyAdaSelector {
    fn select(
        &self,
        preselected: &[Utxo],
        available: &[Utxo],
        target_value: &Value,
    ) -> TxResult<(Vec<Utxo>, Vec<Utxo>)> {
        let mut selected: Vec<Utxo> = preselected.to_vec();
        let mut remainder = Vec::new();
        let mut total = sum_coin(&selected);
        for utxo in available {
            if total >= target_value.coin {
                remainder.push(utxo.clone());
                continue;
            }
            total += utxo.output.value.coin;
            selected.push(utxo.clone());
        }
        if total < target_value.coin {
            return Err(TxError::BalanceInsufficient("ran out of ada in the pool".into()));
        }
        Ok((selected, remainder))
    }
}

fn utxo(seed: u8, address: &[u8], value: Value) -> Utxo {
    Utxo::new(
        TransactionInput::new(TransactionId::new([seed; 32]), 0),
        TransactionOutput::new(Bytes::from(address.to_vec()), value),
    )
}

#[test]
fn s1_simple_ada_payment() {
    let params = sample_params();
    let addr_a = [0x61, b'A'];
    let addr_b = [0x61, b'B'];

    let output = TransactionOutput::new(Bytes::from(addr_b.to_vec()), Value::coin_only(5_000_000));
    let body = TransactionBody::new(Set::new(Vec::<TransactionInput>::new()), vec![output], Coin::new(0));
    let available = vec![utxo(1, &addr_a, Value::coin_only(10_000_000))];

    let result = balance(BalanceRequest {
        body,
        witness_set: WitnessSet::default(),
        params: &params,
        change_address: Bytes::from(addr_a.to_vec()),
        preselected_utxos: &[],
        available_utxos: &available,
        collateral_pool: &[],
        spend_redeemer_bindings: &[],
        ref_script_total_bytes: 0,
        coin_selector: &GreedyAdaSelector,
        evaluator: &NoopEvaluator,
        credentials: &NullCredentials,
    })
    .expect("S1 should balance");

    assert_eq!(result.body.inputs.len(), 1);
    assert_eq!(result.body.outputs.len(), 2, "payment to B plus change to A");
    assert!(result.body.fee.amount() >= 160_000 && result.body.fee.amount() <= 180_000);

    let total_in = sum_coin(&[utxo(1, &addr_a, Value::coin_only(10_000_000))]);
    let total_out: i128 = result.body.outputs.iter().map(|o| o.value.coin).sum();
    assert_eq!(total_out + result.body.fee.amount() as i128, total_in);
}

#[test]
fn s2_mint_then_send() {
    let params = sample_params();
    let addr_a = [0x61, b'A'];
    let addr_b = [0x61, b'B'];
    let policy = PolicyId::new([7u8; 28]);
    let token = AssetName::new(b"TOKEN".to_vec()).unwrap();

    let mut mint = MultiAsset::new();
    mint.insert(policy, token.clone(), 100);

    let mut sent_assets = MultiAsset::new();
    sent_assets.insert(policy, token.clone(), 100);
    let output_to_b = TransactionOutput::new(
        Bytes::from(addr_b.to_vec()),
        Value::new(2_000_000, sent_assets),
    );

    let mut body = TransactionBody::new(
        Set::new(Vec::<TransactionInput>::new()),
        vec![output_to_b],
        Coin::new(0),
    );
    body.mint = Some(mint);

    let available = vec![utxo(2, &addr_a, Value::coin_only(10_000_000))];

    let result = balance(BalanceRequest {
        body,
        witness_set: WitnessSet::default(),
        params: &params,
        change_address: Bytes::from(addr_a.to_vec()),
        preselected_utxos: &[],
        available_utxos: &available,
        collateral_pool: &[],
        spend_redeemer_bindings: &[],
        ref_script_total_bytes: 0,
        coin_selector: &GreedyAdaSelector,
        evaluator: &NoopEvaluator,
        credentials: &NullCredentials,
    })
    .expect("S2 should balance");

    let to_b = result
        .body
        .outputs
        .iter()
        .find(|o| o.address.to_vec() == addr_b.to_vec())
        .expect("output to B");
    assert_eq!(to_b.value.assets.get(&policy, &token), Some(100));

    let change = result
        .body
        .outputs
        .iter()
        .find(|o| o.address.to_vec() == addr_a.to_vec())
        .expect("change output to A");
    assert!(change.value.assets.is_empty(), "change should carry only ada");
}

#[test]
fn s3_script_spend_with_collateral() {
    let params = sample_params();
    let addr_b = [0x61, b'B'];
    let script_addr = [0x71, b'S'];
    let collateral_addr = [0x61, b'C'];

    let script_input = TransactionInput::new(TransactionId::new([5u8; 32]), 0);
    let script_utxo = Utxo::new(
        script_input.clone(),
        TransactionOutput::new(Bytes::from(script_addr.to_vec()), Value::coin_only(8_000_000)),
    );
    let collateral_utxo = utxo(6, &collateral_addr, Value::coin_only(5_000_000));

    let output = TransactionOutput::new(Bytes::from(addr_b.to_vec()), Value::coin_only(4_000_000));
    let body = TransactionBody::new(Set::new(Vec::<TransactionInput>::new()), vec![output], Coin::new(0));

    let mut witness_set = WitnessSet::default();
    witness_set.redeemer = Redeemers::Map(vec![Redeemer {
        tag: RedeemerTag::Spend,
        index: 0,
        data: PlutusData::BigInt(BigInt::from_i128(0)),
        ex_units: ExUnits::default(),
    }]);

    struct FixedExUnitsEvaluator {
        script_input: TransactionInput,
    }

    impl Evaluator for FixedExUnitsEvaluator {
        fn evaluate(&self, body: &TransactionBody, _resolved: &[Utxo]) -> TxResult<Vec<Redeemer>> {
            let position = body
                .inputs
                .iter()
                .position(|i| i == &self.script_input)
                .expect("script input must be in the final input set");
            Ok(vec![Redeemer {
                tag: RedeemerTag::Spend,
                index: position as u32,
                data: PlutusData::BigInt(BigInt::from_i128(0)),
                ex_units: ExUnits { mem: 2_000_000, steps: 800_000_000 },
            }])
        }
    }

    let bindings = vec![SpendRedeemerBinding { input: script_input.clone(), redeemer_index: 0 }];

    let result = balance(BalanceRequest {
        body,
        witness_set,
        params: &params,
        change_address: Bytes::from(collateral_addr.to_vec()),
        preselected_utxos: &[script_utxo],
        available_utxos: &[],
        collateral_pool: &[collateral_utxo],
        spend_redeemer_bindings: &bindings,
        ref_script_total_bytes: 0,
        coin_selector: &GreedyAdaSelector,
        evaluator: &FixedExUnitsEvaluator { script_input: script_input.clone() },
        credentials: &NullCredentials,
    })
    .expect("S3 should balance");

    assert!(result.body.collateral.is_some());
    let required_collateral = cardano_tx::fee::required_collateral(result.body.fee.amount(), &params);
    assert_eq!(result.body.total_collateral.map(|c| c.amount()), Some(required_collateral));

    let redeemer = &result.witness_set.redeemer.as_slice()[0];
    let script_position = result
        .body
        .inputs
        .iter()
        .position(|i| i == &script_input)
        .unwrap();
    assert_eq!(redeemer.index as usize, script_position);
    assert_eq!(redeemer.ex_units, ExUnits { mem: 2_000_000, steps: 800_000_000 });
}
