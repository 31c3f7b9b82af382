use alloy::transports::TransportError;
use serde_json::Value;
use thiserror::Error;

/// Errors produced by the multicall pipeline.
///
/// Everything except [`MulticallError::RpcCallFailed`] and
/// [`MulticallError::DecodeFailure`] is detected before the network call.
#[derive(Debug, Error)]
pub enum MulticallError {
    #[error("malformed arguments for {method}: types {types:?} do not match values {values:?}")]
    MalformedCallArguments {
        method: String,
        types: Vec<String>,
        values: Vec<Value>,
    },

    #[error("invalid call signature `{0}`")]
    InvalidSignature(String),

    #[error("invalid solidity type `{ty}`: {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("cannot encode {value} as {ty}: {reason}")]
    InvalidArgument {
        ty: String,
        value: Value,
        reason: String,
    },

    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("ABI call `{0}` has no target")]
    MissingTarget(String),

    #[error("method `{0}` not found in contract ABI")]
    UnknownMethod(String),

    #[error("expected {expected} call results, got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("declared {expected} return fields but decoded {actual} values")]
    ResultArityMismatch { expected: usize, actual: usize },

    #[error("multicall RPC call failed: {0}")]
    RpcCallFailed(#[from] TransportError),

    #[error("failed to decode {context}: {reason}")]
    DecodeFailure { context: String, reason: String },

    #[error("invalid RPC url `{url}`: {reason}")]
    InvalidRpcUrl { url: String, reason: String },
}

impl MulticallError {
    pub(crate) fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::DecodeFailure {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MulticallError>;
