//! External collaborator contracts (spec §4.8, Component J). The balancer
//! is written against these traits only; a concrete node-RPC client,
//! Bech32/Base58 address codec and Plutus evaluator are all supplied by the
//! embedder. None of their wire/transport shapes are this crate's concern
//! (spec §1, §6) — only the operations the balancer calls.

use cardano_chain::{
    AssetId, Redeemer, StakeCredential, TransactionBody, TransactionInput, TransactionOutput,
    Value,
};

use crate::error::TxResult;
use crate::protocol_parameters::ProtocolParameters;

/// A resolved unspent output: the input it is spent by reference to, and
/// the output it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub input: TransactionInput,
    pub output: TransactionOutput,
}

impl Utxo {
    pub fn new(input: TransactionInput, output: TransactionOutput) -> Self {
        Utxo { input, output }
    }

    pub fn value(&self) -> &Value {
        &self.output.value
    }
}

/// The Bech32/Base58 address codec lives entirely outside this crate (spec
/// §1); this is the narrow seam unique-signer derivation (§4.5) and
/// collateral selection need into it — "what key or script credential does
/// this address/reward-account commit to", nothing about text encoding.
pub trait CredentialResolver {
    fn payment_credential(&self, address: &cardano_chain::Address) -> Option<StakeCredential>;
    fn stake_credential(
        &self,
        reward_account: &cardano_chain::RewardAccount,
    ) -> Option<StakeCredential>;
}

/// `select(preselected, available, target_value) -> (selection, remainder)`
/// (§4.8): the contract is that `Σ selection.value ≥ target_value`
/// component-wise, or the selector reports `BalanceInsufficient` itself.
/// The coin-selection algorithm (largest-first, random-improve, ...) is
/// explicitly out of scope (spec §1); this crate only calls the trait.
pub trait CoinSelector {
    fn select(
        &self,
        preselected: &[Utxo],
        available: &[Utxo],
        target_value: &Value,
    ) -> TxResult<(Vec<Utxo>, Vec<Utxo>)>;
}

/// `evaluate(tx, resolved_utxos) -> redeemer_list_with_ex_units` (§4.8).
/// The evaluator is expected to return one redeemer per input redeemer
/// already present on `body`, with `ex_units` filled in; the balancer
/// copies those back onto its own redeemer list (§4.7 step 8).
pub trait Evaluator {
    fn evaluate(&self, body: &TransactionBody, resolved: &[Utxo]) -> TxResult<Vec<Redeemer>>;
}

/// The node-facing half of §4.8: chain state reads and submission. Every
/// operation returns a `TxResult`; a host implementation maps its own
/// wire/transport errors into `TxError::Provider`.
pub trait Provider {
    fn get_parameters(&self) -> TxResult<ProtocolParameters>;

    fn get_unspent_outputs(&self, address: &cardano_chain::Address) -> TxResult<Vec<Utxo>>;

    fn get_unspent_outputs_with_asset(
        &self,
        address: &cardano_chain::Address,
        asset_id: &AssetId,
    ) -> TxResult<Vec<Utxo>>;

    fn get_unspent_output_by_nft(&self, asset_id: &AssetId) -> TxResult<Utxo>;

    fn resolve_unspent_outputs(&self, inputs: &[TransactionInput]) -> TxResult<Vec<Utxo>>;

    fn resolve_datum(
        &self,
        hash: &cardano_crypto::Hash<32>,
    ) -> TxResult<cardano_chain::PlutusData>;

    fn get_rewards_balance(
        &self,
        reward_address: &cardano_chain::RewardAccount,
    ) -> TxResult<u64>;

    fn submit_transaction(&self, body: &TransactionBody) -> TxResult<cardano_crypto::Hash<32>>;

    fn confirm_transaction(
        &self,
        tx_id: &cardano_crypto::Hash<32>,
        timeout_ms: u64,
    ) -> TxResult<bool>;

    fn evaluate_transaction(
        &self,
        body: &TransactionBody,
        additional_utxos: &[Utxo],
    ) -> TxResult<Vec<Redeemer>>;
}
