//! Error taxonomy for the balancer and its collaborators (spec §7). Layers
//! on top of `cardano_chain::ChainError` for the entity-model failures that
//! can surface while a body is being assembled.

#[derive(Debug, Clone, thiserror::Error)]
pub enum TxError {
    #[error(transparent)]
    Chain(#[from] cardano_chain::ChainError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("the balancer could not reach equilibrium with the available utxos: {0}")]
    BalanceInsufficient(String),

    #[error("the evaluator declined the transaction: {0}")]
    ScriptEvaluationFailure(String),

    #[error("{entity} not found")]
    ElementNotFound { entity: &'static str },

    #[error("provider error: {0}")]
    Provider(String),
}

pub type TxResult<T> = Result<T, TxError>;
