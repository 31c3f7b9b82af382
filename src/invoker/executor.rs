use std::future::Future;

use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use url::Url;

use crate::error::{MulticallError, Result};

/// Read-only contract call against a node.
pub trait CallExecutor: Send + Sync {
    fn call(&self, target: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send;
}

/// [`CallExecutor`] backed by `eth_call` over an alloy provider.
#[derive(Clone)]
pub struct RpcExecutor {
    provider: DynProvider,
    block: Option<BlockId>,
}

impl RpcExecutor {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = Url::parse(rpc_url).map_err(|e| MulticallError::InvalidRpcUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = ProviderBuilder::new().connect_http(url);

        Ok(Self::from_provider(DynProvider::new(client)))
    }

    pub fn from_provider(provider: DynProvider) -> Self {
        Self {
            provider,
            block: None,
        }
    }

    /// Execute calls against `block_number` instead of `latest`.
    pub fn at_block(mut self, block_number: u64) -> Self {
        self.block = Some(BlockId::number(block_number));
        self
    }
}

impl CallExecutor for RpcExecutor {
    async fn call(&self, target: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(target).input(data.into());

        let mut call = self.provider.call(tx);
        if let Some(block) = self.block {
            call = call.block(block);
        }

        Ok(call.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            RpcExecutor::new("not a url"),
            Err(MulticallError::InvalidRpcUrl { .. })
        ));
    }

    #[test]
    fn test_at_block() {
        let executor = RpcExecutor::new("http://localhost:8545").unwrap().at_block(42);

        assert_eq!(executor.block, Some(BlockId::number(42)));
    }
}
