//! Transaction construction core: implicit-coin accounting, unique-signer
//! derivation, fee and collateral computation and the balancer driver that
//! ties them together into a fixed point over a draft transaction.
//!
//! This crate has no opinion on wire encoding (`cardano-codec`), entity
//! shapes (`cardano-chain`) or hashing (`cardano-crypto`) — it only
//! orchestrates them against a caller-supplied provider, coin selector,
//! evaluator and credential resolver (`provider`).

pub mod balancer;
pub mod error;
pub mod fee;
pub mod implicit_coin;
pub mod protocol_parameters;
pub mod provider;
pub mod signers;

#[cfg(test)]
mod test_support;

pub use balancer::{balance, BalanceRequest, BalancedTransaction, SpendRedeemerBinding};
pub use error::{TxError, TxResult};
pub use implicit_coin::ImplicitCoin;
pub use protocol_parameters::ProtocolParameters;
pub use provider::{CoinSelector, CredentialResolver, Evaluator, Provider, Utxo};
pub use signers::unique_signers;
