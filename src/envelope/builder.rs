use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use log::debug;
use serde_json::Value;

use super::store::{unbounded_store, EnvelopeStore};
use crate::abis::{IMulticall, McCall};
use crate::call::CallDescriptor;
use crate::error::{MulticallError, Result};
use crate::utils::coerce_json;

/// Encodes call lists into `aggregate` envelopes, memoized by call-list content.
pub struct EnvelopeBuilder {
    store: Arc<dyn EnvelopeStore>,
    encodings: AtomicUsize,
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new(Arc::new(unbounded_store()))
    }
}

impl EnvelopeBuilder {
    pub fn new(store: Arc<dyn EnvelopeStore>) -> Self {
        Self {
            store,
            encodings: AtomicUsize::new(0),
        }
    }

    /// Envelope for `calls`, encoding only when the store has no entry.
    ///
    /// The envelope is the ABI encoding of `aggregate`'s parameters,
    /// `((address,bytes)[])`, without the function selector.
    pub fn build(&self, calls: &[CallDescriptor]) -> Result<Bytes> {
        let key = cache_key(calls);

        if let Some(envelope) = self.store.get(&key) {
            debug!("Envelope cache hit for {} calls", calls.len());
            return Ok(envelope);
        }

        debug!("Envelope cache miss for {} calls", calls.len());
        let envelope = self.encode(calls)?;
        self.store.insert(key, envelope.clone());

        Ok(envelope)
    }

    /// Number of envelopes actually encoded (cache misses).
    pub fn encode_count(&self) -> usize {
        self.encodings.load(Ordering::Relaxed)
    }

    fn encode(&self, calls: &[CallDescriptor]) -> Result<Bytes> {
        self.encodings.fetch_add(1, Ordering::Relaxed);

        let calls = calls
            .iter()
            .map(|call| {
                Ok(McCall {
                    target: call.target,
                    callData: encode_call_data(call)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut envelope = Vec::new();
        IMulticall::aggregateCall { calls }.abi_encode_raw(&mut envelope);

        Ok(envelope.into())
    }
}

fn cache_key(calls: &[CallDescriptor]) -> String {
    Value::Array(calls.iter().map(CallDescriptor::to_json).collect()).to_string()
}

/// `selector ++ abi_encode(args)` for a single call.
pub fn encode_call_data(call: &CallDescriptor) -> Result<Bytes> {
    let mut data = call.selector().to_vec();

    if !call.args.is_empty() {
        let values = call
            .args
            .iter()
            .map(|(value, ty)| {
                coerce_json(ty, value).map_err(|e| MulticallError::InvalidArgument {
                    ty: ty.to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        data.extend(DynSolValue::Tuple(values).abi_encode_params());
    }

    Ok(data.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{normalize, Call};
    use crate::envelope::bounded_store;
    use alloy::dyn_abi::DynSolType;
    use alloy::primitives::{Address, U256};

    fn descriptors(calls: &[Call]) -> Vec<CallDescriptor> {
        normalize(calls, Address::with_last_byte(0xaa)).unwrap()
    }

    fn decode_envelope(envelope: &[u8]) -> Vec<McCall> {
        let payload = [IMulticall::aggregateCall::SELECTOR.as_slice(), envelope].concat();
        IMulticall::aggregateCall::abi_decode(&payload).unwrap().calls
    }

    #[test]
    fn test_call_data_layout() {
        let calls = descriptors(&[Call::signature("balanceOf(address)(uint256)")
            .arg("0x00000000000000000000000000000000000000ff")]);

        let data = encode_call_data(&calls[0]).unwrap();

        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data[35], 0xff);
    }

    #[test]
    fn test_call_data_without_args_is_selector() {
        let calls = descriptors(&[Call::current_block_timestamp()]);

        let data = encode_call_data(&calls[0]).unwrap();

        assert_eq!(&data[..], IMulticall::getCurrentBlockTimestampCall::SELECTOR.as_slice());
    }

    #[test]
    fn test_invalid_argument_value() {
        let calls = descriptors(&[Call::signature("f(uint256)").arg("not a number")]);

        assert!(matches!(
            EnvelopeBuilder::default().build(&calls),
            Err(MulticallError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_short_address_is_rejected() {
        let calls = descriptors(&[Call::signature("balanceOf(address)(uint256)").arg("0x01")]);

        match EnvelopeBuilder::default().build(&calls) {
            Err(MulticallError::InvalidArgument { ty, value, .. }) => {
                assert_eq!(ty, "address");
                assert_eq!(value, serde_json::json!("0x01"));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_preserves_targets_and_order() {
        let token = Address::with_last_byte(0x01);
        let calls = descriptors(&[
            Call::signature("totalSupply()(uint256)").target(token),
            Call::eth_balance(token),
            Call::signature("transferFrom(address,address,uint256)(bool)")
                .target(token)
                .args([
                    serde_json::json!(Address::with_last_byte(2).to_string()),
                    serde_json::json!(Address::with_last_byte(3).to_string()),
                    serde_json::json!(7),
                ]),
        ]);

        let envelope = EnvelopeBuilder::default().build(&calls).unwrap();
        let decoded = decode_envelope(&envelope);

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].target, token);
        assert_eq!(decoded[1].target, Address::with_last_byte(0xaa));
        assert_eq!(decoded[2].target, token);

        let args = DynSolType::parse("(address,address,uint256)")
            .unwrap()
            .abi_decode_params(&decoded[2].callData[4..])
            .unwrap();
        assert_eq!(
            args,
            DynSolValue::Tuple(vec![
                DynSolValue::Address(Address::with_last_byte(2)),
                DynSolValue::Address(Address::with_last_byte(3)),
                DynSolValue::Uint(U256::from(7), 256),
            ])
        );
    }

    #[test]
    fn test_identical_batches_encode_once() {
        let builder = EnvelopeBuilder::default();
        let calls = descriptors(&[
            Call::signature("balanceOf(address)(uint256)")
                .arg(Address::with_last_byte(1).to_string())
                .returns("a"),
            Call::current_block_timestamp().returns("ts"),
        ]);

        let first = builder.build(&calls).unwrap();
        let second = builder.build(&calls.clone()).unwrap();

        assert_eq!(first, second);
        assert_eq!(builder.encode_count(), 1);

        let other = descriptors(&[Call::signature("balanceOf(address)(uint256)")
            .arg(Address::with_last_byte(2).to_string())]);
        builder.build(&other).unwrap();
        assert_eq!(builder.encode_count(), 2);
    }

    #[test]
    fn test_isolated_stores() {
        let calls = descriptors(&[Call::last_block_hash()]);
        let a = EnvelopeBuilder::new(Arc::new(bounded_store(4)));
        let b = EnvelopeBuilder::new(Arc::new(bounded_store(4)));

        a.build(&calls).unwrap();
        a.build(&calls).unwrap();
        b.build(&calls).unwrap();

        assert_eq!(a.encode_count(), 1);
        assert_eq!(b.encode_count(), 1);
    }
}
