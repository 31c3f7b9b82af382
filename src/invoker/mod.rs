mod executor;

pub use executor::{CallExecutor, RpcExecutor};

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use log::debug;

use crate::abis::IMulticall;
use crate::error::Result;

/// Send one `aggregate` call carrying `envelope` to the multicall contract.
///
/// Failures are returned as-is; retrying is left to the caller.
pub async fn invoke<E: CallExecutor>(
    executor: &E,
    multicall: Address,
    envelope: &Bytes,
    calls: usize,
) -> Result<Bytes> {
    let mut payload = Vec::with_capacity(4 + envelope.len());
    payload.extend_from_slice(&IMulticall::aggregateCall::SELECTOR);
    payload.extend_from_slice(envelope);

    debug!(
        "Submitting aggregate of {} calls to {} ({} bytes)",
        calls,
        multicall,
        payload.len()
    );

    executor.call(multicall, payload.into()).await
}
