use std::collections::HashMap;

use alloy::dyn_abi::{DynSolType, DynSolValue, FunctionExt};
use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use serde_json::Value;

use super::coerce::FieldKind;
use crate::abis::IMulticall;
use crate::call::{CallDescriptor, ReturnField};
use crate::error::{MulticallError, Result};

/// Decoded `aggregate` response: block number and one blob per call.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResponse {
    pub block_number: u64,
    pub return_data: Vec<Bytes>,
}

/// Keyed values of a batch.
///
/// `original` holds decoded values, `transformed` the output of each field's
/// transform (or the decoded value when it has none). A key used by several
/// fields keeps the value of the last one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateResult {
    pub block_number: u64,
    pub original: HashMap<String, DynSolValue>,
    pub transformed: HashMap<String, DynSolValue>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateOutput {
    pub results: AggregateResult,
    /// Output key -> arguments of the call that produced it
    pub key_to_arg_map: HashMap<String, Vec<Value>>,
}

/// Per-call decoded values, in call order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedBatch {
    pub block_number: u64,
    pub results: Vec<Vec<DynSolValue>>,
}

/// Decode the outer `(uint256, bytes[])` and check one blob came back per call.
pub fn decode_response(data: &[u8], expected_calls: usize) -> Result<BatchResponse> {
    let decoded = IMulticall::aggregateCall::abi_decode_returns(data)
        .map_err(|e| MulticallError::decode("aggregate response", e))?;

    let block_number = u64::try_from(decoded.blockNumber)
        .map_err(|e| MulticallError::decode("block number", e))?;

    if decoded.returnData.len() != expected_calls {
        return Err(MulticallError::ResultCountMismatch {
            expected: expected_calls,
            actual: decoded.returnData.len(),
        });
    }

    Ok(BatchResponse {
        block_number,
        return_data: decoded.returnData,
    })
}

/// Decode one call's return blob against its declared return types.
fn decode_fields(call: &CallDescriptor, data: &[u8]) -> Result<Vec<DynSolValue>> {
    if call.return_types.is_empty() {
        return Ok(Vec::new());
    }

    let decoded = DynSolType::Tuple(call.return_types.clone())
        .abi_decode_params(data)
        .map_err(|e| MulticallError::decode(format!("result of {}", call.method), e))?;

    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    Ok(call
        .return_types
        .iter()
        .zip(values)
        .map(|(ty, value)| FieldKind::from(ty).normalize(value))
        .collect())
}

/// Map a response onto the calls' return keys.
///
/// Decoded values are flattened in call order then field order and paired
/// with the flattened return fields. Nothing is mapped unless both counts
/// agree.
pub fn map_results(calls: &[CallDescriptor], response: BatchResponse) -> Result<AggregateOutput> {
    let mut values = Vec::new();
    for (call, data) in calls.iter().zip(&response.return_data) {
        values.extend(decode_fields(call, data)?);
    }

    let fields: Vec<&ReturnField> = calls.iter().flat_map(|call| &call.returns).collect();
    if fields.len() != values.len() {
        return Err(MulticallError::ResultArityMismatch {
            expected: fields.len(),
            actual: values.len(),
        });
    }

    let mut original = HashMap::with_capacity(fields.len());
    let mut transformed = HashMap::with_capacity(fields.len());
    for (field, value) in fields.into_iter().zip(values) {
        transformed.insert(field.key.clone(), field.apply(&value));
        original.insert(field.key.clone(), value);
    }

    Ok(AggregateOutput {
        results: AggregateResult {
            block_number: response.block_number,
            original,
            transformed,
        },
        key_to_arg_map: key_to_args(calls),
    })
}

fn key_to_args(calls: &[CallDescriptor]) -> HashMap<String, Vec<Value>> {
    let mut map = HashMap::new();

    for call in calls.iter().filter(|c| !c.returns.is_empty() && !c.args.is_empty()) {
        let args = call.arg_values();
        for field in &call.returns {
            map.insert(field.key.clone(), args.clone());
        }
    }

    map
}

/// Decode every blob with its call's own ABI, without flattening or renaming.
///
/// ABI-resolved calls decode through their contract function; signature
/// calls through their declared return types.
pub fn decode_native(calls: &[CallDescriptor], response: BatchResponse) -> Result<DecodedBatch> {
    let results = calls
        .iter()
        .zip(&response.return_data)
        .map(|(call, data)| match &call.function {
            Some(function) => function
                .abi_decode_output(data)
                .map_err(|e| MulticallError::decode(format!("result of {}", call.method), e)),
            None => decode_fields(call, data),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DecodedBatch {
        block_number: response.block_number,
        results,
    })
}
