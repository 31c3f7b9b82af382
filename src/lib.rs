pub mod abis;
pub mod call;
pub mod config;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod invoker;
pub mod multicall;
pub mod utils;

pub use call::{Call, CallDescriptor, ReturnField, Transform, TypeResolver};
pub use config::Settings;
pub use decoder::{AggregateOutput, AggregateResult, DecodedBatch};
pub use envelope::{EnvelopeBuilder, EnvelopeStore};
pub use error::{MulticallError, Result};
pub use invoker::{CallExecutor, RpcExecutor};
pub use multicall::Multicall;
