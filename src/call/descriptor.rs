use alloy::dyn_abi::DynSolType;
use alloy::json_abi::Function;
use alloy::primitives::{keccak256, Address, Selector};
use serde_json::{json, Value};

use super::ReturnField;

/// Canonical form of one call in a batch.
#[derive(Clone, Debug)]
pub struct CallDescriptor {
    pub target: Address,
    /// `name(argTypes)`, without return types
    pub method: String,
    /// Raw argument values paired with their declared types
    pub args: Vec<(Value, DynSolType)>,
    pub return_types: Vec<DynSolType>,
    pub returns: Vec<ReturnField>,
    /// Present when the call was resolved from a contract ABI
    pub function: Option<Function>,
}

impl CallDescriptor {
    /// First four bytes of `keccak256(method)`.
    pub fn selector(&self) -> Selector {
        Selector::from_slice(&keccak256(self.method.as_bytes())[..4])
    }

    pub fn arg_values(&self) -> Vec<Value> {
        self.args.iter().map(|(value, _)| value.clone()).collect()
    }

    /// Deterministic JSON identity of the call, transforms excluded.
    pub(crate) fn to_json(&self) -> Value {
        json!({
            "target": self.target.to_string(),
            "method": self.method,
            "args": self
                .args
                .iter()
                .map(|(value, ty)| json!([value, ty.to_string()]))
                .collect::<Vec<_>>(),
            "returnTypes": self
                .return_types
                .iter()
                .map(DynSolType::to_string)
                .collect::<Vec<_>>(),
        })
    }
}
