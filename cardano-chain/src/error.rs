/// Error taxonomy for the entity model (spec §7), layered on top of
/// `cardano_codec::CodecError` for the purely mechanical wire failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Codec(#[from] cardano_codec::CodecError),

    #[error("{entity} not found")]
    ElementNotFound { entity: &'static str },

    #[error("duplicated key while inserting into {entity}")]
    DuplicatedKey { entity: &'static str },

    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(String),

    #[error("bounded bytes/text chunk of {actual} bytes exceeds the {limit}-byte on-chain limit")]
    InvalidMetadatumBoundedBytesSize { actual: usize, limit: usize },

    #[error("invalid metadatum: {0}")]
    InvalidMetadatum(String),

    #[error("invalid plutus cost model: {0}")]
    InvalidPlutusCostModel(String),
}

pub type ChainResult<T> = Result<T, ChainError>;
