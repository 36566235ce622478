use std::fmt;

/// Error taxonomy for the codec kernel (spec §7: `Invalid*`, `Encoding`,
/// `Decoding`, `OutOfBounds`). Every variant carries a breadcrumb so a
/// caller can tell which entity and which step failed without re-running
/// the decoder under a debugger.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodecError {
    #[error("decoding {breadcrumb}: {source}")]
    Decoding { breadcrumb: String, source: String },

    #[error("encoding: {0}")]
    Encoding(String),

    #[error("invalid cbor: {0}")]
    InvalidCbor(String),

    #[error("value out of bounds: {0}")]
    OutOfBounds(String),

    #[error("duplicated key while decoding {entity}")]
    DuplicatedKey { entity: &'static str },

    #[error("bounded bytes/text chunk of {actual} bytes exceeds the {limit}-byte on-chain limit")]
    BoundedBytesSize { actual: usize, limit: usize },
}

impl CodecError {
    pub fn decoding(breadcrumb: impl Into<String>, source: impl fmt::Display) -> Self {
        CodecError::Decoding {
            breadcrumb: breadcrumb.into(),
            source: source.to_string(),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

impl From<CodecError> for minicbor::decode::Error {
    fn from(value: CodecError) -> Self {
        minicbor::decode::Error::message(value.to_string())
    }
}
