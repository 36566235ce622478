//! The balancer driver (spec §4.7, Component I): a bounded fixed-point
//! iteration over selected inputs, change output, fee and collateral.
//! Grounded on the fee-convergence `loop` in
//! `pallas_txbuilder::builder::StagingTransaction::build_conway_raw` (which
//! re-derives the fee from a growing tx size until it stops increasing),
//! generalized here to also re-derive the coin selection and collateral on
//! every pass rather than assuming a fixed input set.

use cardano_chain::{
    AddrKeyhash, Coin, TransactionBody, TransactionInput, TransactionOutput, Value, WitnessSet,
};
use cardano_codec::set::Set;

use crate::error::{TxError, TxResult};
use crate::fee;
use crate::implicit_coin;
use crate::protocol_parameters::ProtocolParameters;
use crate::provider::{CoinSelector, CredentialResolver, Evaluator, Utxo};
use crate::signers;

/// A spend redeemer's association with the input it redeems, tracked
/// outside the witness set because the witness set only carries the
/// redeemer's *current* index (§4.7 step 5) — the balancer needs the
/// stable identity to know which redeemer to renumber as the input set's
/// sorted order shifts between iterations.
pub struct SpendRedeemerBinding {
    pub input: TransactionInput,
    pub redeemer_index: usize,
}

/// Everything the balancer needs beyond the draft body and witness set.
/// Grouped into one struct (rather than a long parameter list) the way
/// `pallas_txbuilder::builder::StagingTransaction` groups its accumulated
/// fields.
pub struct BalanceRequest<'a> {
    pub body: TransactionBody,
    pub witness_set: WitnessSet,
    pub params: &'a ProtocolParameters,
    pub change_address: cardano_chain::Address,
    pub preselected_utxos: &'a [Utxo],
    pub available_utxos: &'a [Utxo],
    pub collateral_pool: &'a [Utxo],
    pub spend_redeemer_bindings: &'a [SpendRedeemerBinding],
    pub ref_script_total_bytes: u64,
    pub coin_selector: &'a dyn CoinSelector,
    pub evaluator: &'a dyn Evaluator,
    pub credentials: &'a dyn CredentialResolver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancedTransaction {
    pub body: TransactionBody,
    pub witness_set: WitnessSet,
    pub unique_signers: Vec<AddrKeyhash>,
}

const MAX_ITERATIONS: u32 = 32;

fn sum_values<'a>(values: impl Iterator<Item = &'a Value>) -> TxResult<Value> {
    let mut total = Value::default();
    for v in values {
        total = total.add(v)?;
    }
    Ok(total)
}

fn reset(body: &mut TransactionBody, original_outputs: &[TransactionOutput]) {
    body.outputs = original_outputs.to_vec();
    body.inputs = Set::new(Vec::<TransactionInput>::new());
    body.collateral = None;
    body.collateral_return = None;
    body.total_collateral = None;
}

fn find_utxo<'a>(pool: &'a [Utxo], input: &TransactionInput) -> Option<&'a Utxo> {
    pool.iter().find(|u| &u.input == input)
}

fn encoded_len<T: minicbor::Encode<()>>(value: &T) -> TxResult<u64> {
    cardano_codec::encoded_len(value)
        .map(|len| len as u64)
        .map_err(|e| TxError::InvalidArgument(e.to_string()))
}

/// Greedy largest-first collateral selection, bounded by
/// `max_collateral_inputs` (§4.6).
fn select_collateral(
    pool: &[Utxo],
    required: u64,
    max_inputs: u64,
) -> TxResult<(Vec<TransactionInput>, u64)> {
    let mut candidates: Vec<&Utxo> = pool.iter().collect();
    candidates.sort_by(|a, b| b.output.value.coin.cmp(&a.output.value.coin));

    let mut selected = Vec::new();
    let mut total: u64 = 0;
    for utxo in candidates {
        if total >= required {
            break;
        }
        if selected.len() as u64 >= max_inputs {
            break;
        }
        selected.push(utxo.input.clone());
        total += utxo.output.value.coin.max(0) as u64;
    }

    if total < required {
        return Err(TxError::BalanceInsufficient(
            "collateral pool cannot cover the required collateral".into(),
        ));
    }

    Ok((selected, total))
}

/// Runs the fixed-point iteration to completion, or returns
/// `TxError::BalanceInsufficient` once `MAX_ITERATIONS` is exceeded without
/// converging (§4.7, non-convergence note).
pub fn balance(request: BalanceRequest<'_>) -> TxResult<BalancedTransaction> {
    let BalanceRequest {
        mut body,
        mut witness_set,
        params,
        change_address,
        preselected_utxos,
        available_utxos,
        collateral_pool,
        spend_redeemer_bindings,
        ref_script_total_bytes,
        coin_selector,
        evaluator,
        credentials,
    } = request;

    let original_outputs = body.outputs.clone();
    let mut fee: u64 = body.fee.amount();
    let mut change_padding: u64 = 0;
    let mut collateral_padding: u64 = 0;

    for _ in 0..MAX_ITERATIONS {
        // Step 1-3: required input value.
        let total_output = sum_values(body.outputs.iter().map(|o| &o.value))?;
        let implicit = implicit_coin::compute(&body, params);
        let mint = body.mint.clone().unwrap_or_default();
        let net_coin = implicit.net() - fee as i128 - change_padding as i128;
        let implicit_value = Value::new(net_coin, mint);
        let required_input = total_output.sub(&implicit_value)?;

        // Step 4-5: selection and redeemer renumbering.
        let (selection, _remainder) =
            coin_selector.select(preselected_utxos, available_utxos, &required_input)?;
        let inputs: Vec<TransactionInput> = selection.iter().map(|u| u.input.clone()).collect();
        body.inputs = Set::new(inputs);

        for binding in spend_redeemer_bindings {
            let position = body
                .inputs
                .iter()
                .position(|i| i == &binding.input)
                .ok_or(TxError::ElementNotFound {
                    entity: "spend redeemer input in the selected input set",
                })?;
            if let Some(redeemer) = witness_set
                .redeemer
                .as_mut_slice()
                .get_mut(binding.redeemer_index)
            {
                redeemer.index = position as u32;
            }
        }

        // Step 6: change value.
        let total_input = sum_values(selection.iter().map(|u| &u.output.value))?;
        let mut change = total_input.sub(&required_input)?;
        change.coin += change_padding as i128;

        // Step 7: change output, with min-ada retry.
        if !change.is_zero() {
            let (coin, assets) = change.to_wire_positive()?;
            let change_output = TransactionOutput::new(change_address.clone(), Value::new(coin.amount() as i128, assets));
            let min_ada = fee::min_ada_for_output(&change_output, params)?;
            if coin.amount() < min_ada {
                change_padding += min_ada - coin.amount();
                reset(&mut body, &original_outputs);
                continue;
            }
            body.outputs.push(change_output);
        }

        // Step 8: script evaluation.
        if !witness_set.redeemer.is_empty() {
            let evaluated = evaluator.evaluate(&body, &selection)?;
            for result in evaluated {
                if let Some(redeemer) = witness_set
                    .redeemer
                    .as_mut_slice()
                    .iter_mut()
                    .find(|r| r.tag == result.tag && r.index == result.index)
                {
                    redeemer.ex_units = result.ex_units;
                }
            }
        }

        // Collateral, with min-ada retry on the return output.
        let mut collateral_utxos: Vec<Utxo> = Vec::new();
        if !witness_set.redeemer.is_empty() {
            let required = fee::required_collateral(fee, params) + collateral_padding;
            let (collateral_inputs, total_collateral) =
                select_collateral(collateral_pool, required, params.max_collateral_inputs)?;
            collateral_utxos = collateral_inputs
                .iter()
                .filter_map(|i| find_utxo(collateral_pool, i).cloned())
                .collect();
            body.collateral = Some(Set::new(collateral_inputs));

            if total_collateral > required {
                let return_coin = total_collateral - required;
                let collateral_return =
                    TransactionOutput::new(change_address.clone(), Value::coin_only(return_coin));
                let min_ada = fee::min_ada_for_output(&collateral_return, params)?;
                if return_coin < min_ada {
                    collateral_padding += min_ada - return_coin;
                    reset(&mut body, &original_outputs);
                    continue;
                }
                body.collateral_return = Some(collateral_return);
                body.total_collateral = Some(Coin::new(required));
            } else {
                body.total_collateral = Some(Coin::new(total_collateral));
                body.collateral_return = None;
            }
        }

        // Step 9: fee re-derivation.
        let signer_count =
            signers::unique_signers(&body, &selection, &collateral_utxos, credentials).len() as u64;
        let tx_size = encoded_len(&body)? + encoded_len(&witness_set)?;
        let required_fee = fee::min_fee(
            tx_size,
            witness_set.redeemer.as_slice(),
            ref_script_total_bytes,
            params,
        ) + fee::signer_padding_fee(signer_count, params);

        if required_fee > fee {
            fee = required_fee;
            reset(&mut body, &original_outputs);
            continue;
        }
        body.fee = Coin::new(fee);

        // Step 10: balanced-ness check.
        let final_total_output = sum_values(body.outputs.iter().map(|o| &o.value))?;
        let final_total_input = sum_values(selection.iter().map(|u| &u.output.value))?;
        let final_mint = body.mint.clone().unwrap_or_default();
        let final_implicit =
            Value::new(implicit_coin::compute(&body, params).net() - fee as i128, final_mint);
        let residual = final_total_output
            .sub(&final_total_input)?
            .sub(&final_implicit)?;

        if !residual.is_zero() {
            return Err(TxError::BalanceInsufficient(
                "body did not reach equilibrium after fee and collateral settled".into(),
            ));
        }

        let unique_signers =
            signers::unique_signers(&body, &selection, &collateral_utxos, credentials);
        return Ok(BalancedTransaction { body, witness_set, unique_signers });
    }

    Err(TxError::BalanceInsufficient(format!(
        "did not converge within {MAX_ITERATIONS} iterations"
    )))
}
