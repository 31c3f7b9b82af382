use std::sync::Arc;

use alloy::primitives::Address;
use log::debug;

use crate::call::{normalize, Call, CallDescriptor};
use crate::config::Settings;
use crate::decoder::{
    decode_native, decode_response, map_results, AggregateOutput, BatchResponse, DecodedBatch,
};
use crate::envelope::{bounded_store, unbounded_store, EnvelopeBuilder};
use crate::error::Result;
use crate::invoker::{invoke, CallExecutor, RpcExecutor};

/// Batches read calls into one `aggregate` round trip.
///
/// Cloning is cheap; clones share the executor and the envelope cache.
pub struct Multicall<E> {
    executor: Arc<E>,
    envelopes: Arc<EnvelopeBuilder>,
    address: Address,
}

impl<E> Clone for Multicall<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            envelopes: self.envelopes.clone(),
            address: self.address,
        }
    }
}

impl Multicall<RpcExecutor> {
    /// Client for the configured node and multicall contract.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut executor = RpcExecutor::new(&settings.rpc_url)?;
        if let Some(block) = settings.block {
            executor = executor.at_block(block);
        }

        let envelopes = match settings.envelope_cache_capacity {
            Some(capacity) => EnvelopeBuilder::new(Arc::new(bounded_store(capacity))),
            None => EnvelopeBuilder::new(Arc::new(unbounded_store())),
        };

        Ok(Self::with_envelopes(
            executor,
            settings.multicall_address()?,
            Arc::new(envelopes),
        ))
    }
}

impl<E: CallExecutor> Multicall<E> {
    pub fn new(executor: E, address: Address) -> Self {
        Self::with_envelopes(executor, address, Arc::new(EnvelopeBuilder::default()))
    }

    /// Use a caller-owned envelope builder, e.g. to share one cache between clients.
    pub fn with_envelopes(executor: E, address: Address, envelopes: Arc<EnvelopeBuilder>) -> Self {
        Self {
            executor: Arc::new(executor),
            envelopes,
            address,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn envelopes(&self) -> &EnvelopeBuilder {
        &self.envelopes
    }

    pub fn normalize(&self, calls: &[Call]) -> Result<Vec<CallDescriptor>> {
        normalize(calls, self.address)
    }

    /// Run `calls` and map their return fields onto the requested keys.
    pub async fn aggregate(&self, calls: &[Call]) -> Result<AggregateOutput> {
        let descriptors = self.normalize(calls)?;
        let response = self.submit(&descriptors).await?;

        map_results(&descriptors, response)
    }

    /// Run `calls` and return each call's decoded values as-is.
    pub async fn aggregate_decoded(&self, calls: &[Call]) -> Result<DecodedBatch> {
        let descriptors = self.normalize(calls)?;
        let response = self.submit(&descriptors).await?;

        decode_native(&descriptors, response)
    }

    async fn submit(&self, descriptors: &[CallDescriptor]) -> Result<BatchResponse> {
        let envelope = self.envelopes.build(descriptors)?;
        let data = invoke(&*self.executor, self.address, &envelope, descriptors.len()).await?;
        let response = decode_response(&data, descriptors.len())?;

        debug!(
            "Aggregate of {} calls answered at block {}",
            descriptors.len(),
            response.block_number
        );

        Ok(response)
    }
}
