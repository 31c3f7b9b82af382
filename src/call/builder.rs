use std::fmt;
use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde_json::Value;

use super::resolver::TypeResolver;
use crate::abis::IMulticall;
use crate::error::{MulticallError, Result};

/// User transform applied to a decoded return field.
pub type Transform = Arc<dyn Fn(&DynSolValue) -> DynSolValue + Send + Sync>;

/// Output key for one decoded return field, with an optional transform.
#[derive(Clone)]
pub struct ReturnField {
    pub key: String,
    pub transform: Option<Transform>,
}

impl ReturnField {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            transform: None,
        }
    }

    pub fn with_transform<F>(key: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&DynSolValue) -> DynSolValue + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            transform: Some(Arc::new(transform)),
        }
    }

    /// Transformed value, or a copy of `value` when there is no transform.
    pub fn apply(&self, value: &DynSolValue) -> DynSolValue {
        match &self.transform {
            Some(transform) => transform(value),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for ReturnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnField")
            .field("key", &self.key)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// A read call as described by the caller.
///
/// Built either from a pseudo-signature carrying its return types:
///
/// ```ignore
/// let call = Call::signature("balanceOf(address)(uint256)")
///     .target(token)
///     .arg(owner.to_string())
///     .returns("balance");
/// ```
///
/// or from a contract ABI, where types are looked up by method name:
///
/// ```ignore
/// let call = Call::abi(erc20_abi, "balanceOf").target(token).arg(owner.to_string());
/// ```
///
/// Calls without a target are sent to the multicall contract itself.
#[derive(Clone, Debug)]
pub struct Call {
    pub target: Option<Address>,
    pub resolver: TypeResolver,
    pub args: Vec<Value>,
    pub returns: Vec<ReturnField>,
}

impl Call {
    pub fn new(resolver: TypeResolver) -> Self {
        Self {
            target: None,
            resolver,
            args: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Call described by `name(argTypes)(returnTypes)`.
    pub fn signature(signature: impl Into<String>) -> Self {
        Self::new(TypeResolver::Signature(signature.into()))
    }

    /// Call resolved against a contract ABI by method name.
    pub fn abi(abi: Arc<JsonAbi>, method: impl Into<String>) -> Self {
        Self::new(TypeResolver::Abi {
            abi,
            method: method.into(),
        })
    }

    pub fn target(mut self, target: Address) -> Self {
        self.target = Some(target);
        self
    }

    pub fn target_str(self, target: &str) -> Result<Self> {
        let address = target
            .parse()
            .map_err(|_| MulticallError::InvalidAddress(target.to_string()))?;
        Ok(self.target(address))
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn returns(mut self, key: impl Into<String>) -> Self {
        self.returns.push(ReturnField::new(key));
        self
    }

    pub fn returns_with<F>(mut self, key: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&DynSolValue) -> DynSolValue + Send + Sync + 'static,
    {
        self.returns.push(ReturnField::with_transform(key, transform));
        self
    }

    // ============================================
    // Multicall contract helpers
    // ============================================

    fn multicall_fn<C: SolCall>(return_type: &str) -> Self {
        Self::signature(format!("{}({return_type})", C::SIGNATURE))
    }

    /// Native balance of `address`.
    pub fn eth_balance(address: Address) -> Self {
        Self::multicall_fn::<IMulticall::getEthBalanceCall>("uint256").arg(address.to_string())
    }

    pub fn block_hash(block_number: u64) -> Self {
        Self::multicall_fn::<IMulticall::getBlockHashCall>("bytes32").arg(block_number)
    }

    pub fn last_block_hash() -> Self {
        Self::multicall_fn::<IMulticall::getLastBlockHashCall>("bytes32")
    }

    pub fn current_block_timestamp() -> Self {
        Self::multicall_fn::<IMulticall::getCurrentBlockTimestampCall>("uint256")
    }

    pub fn current_block_difficulty() -> Self {
        Self::multicall_fn::<IMulticall::getCurrentBlockDifficultyCall>("uint256")
    }

    pub fn current_block_gas_limit() -> Self {
        Self::multicall_fn::<IMulticall::getCurrentBlockGasLimitCall>("uint256")
    }

    pub fn current_block_coinbase() -> Self {
        Self::multicall_fn::<IMulticall::getCurrentBlockCoinbaseCall>("address")
    }
}
