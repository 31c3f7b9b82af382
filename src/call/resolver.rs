use std::sync::Arc;

use alloy::dyn_abi::DynSolType;
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::Address;
use serde_json::Value;

use super::{Call, CallDescriptor};
use crate::error::{MulticallError, Result};

/// Source of a call's argument and return types.
#[derive(Clone, Debug)]
pub enum TypeResolver {
    /// `name(argTypes)(returnTypes)`
    Signature(String),
    /// Method looked up by name in the contract's ABI
    Abi { abi: Arc<JsonAbi>, method: String },
}

/// Types resolved for one call.
#[derive(Clone, Debug)]
pub struct ResolvedTypes {
    /// Canonical `name(argTypes)` string the selector is derived from
    pub method: String,
    pub arg_types: Vec<DynSolType>,
    pub return_types: Vec<DynSolType>,
    pub function: Option<Function>,
}

impl TypeResolver {
    /// Resolve types for a call made with `args`.
    ///
    /// Fails with [`MulticallError::MalformedCallArguments`] when the number
    /// of argument types does not match the number of values.
    pub fn resolve(&self, args: &[Value]) -> Result<ResolvedTypes> {
        match self {
            Self::Signature(signature) => resolve_signature(signature, args),
            Self::Abi { abi, method } => resolve_abi(abi, method, args),
        }
    }
}

/// Normalize calls into descriptors.
///
/// Signature calls without a target go to `default_target`. ABI calls must
/// name the contract their ABI belongs to.
pub fn normalize(calls: &[Call], default_target: Address) -> Result<Vec<CallDescriptor>> {
    calls
        .iter()
        .map(|call| {
            let target = match (&call.resolver, call.target) {
                (_, Some(target)) => target,
                (TypeResolver::Signature(_), None) => default_target,
                (TypeResolver::Abi { method, .. }, None) => {
                    return Err(MulticallError::MissingTarget(method.clone()))
                },
            };
            let resolved = call.resolver.resolve(&call.args)?;

            Ok(CallDescriptor {
                target,
                method: resolved.method,
                args: call.args.iter().cloned().zip(resolved.arg_types).collect(),
                return_types: resolved.return_types,
                returns: call.returns.clone(),
                function: resolved.function,
            })
        })
        .collect()
}

// ============================================
// Signature mode
// ============================================

/// Contents of every `(...)` group, each ending at the first `)` after its `(`.
fn paren_groups(signature: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = signature;

    while let Some(open) = rest.find('(') {
        let inner = &rest[open + 1..];
        let Some(close) = inner.find(')') else {
            break;
        };
        groups.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    groups
}

fn split_types(group: &str) -> Vec<&str> {
    group
        .split(',')
        .map(str::trim)
        .filter(|ty| !ty.is_empty())
        .collect()
}

fn parse_types(types: &[&str]) -> Result<Vec<DynSolType>> {
    types
        .iter()
        .map(|ty| {
            DynSolType::parse(ty).map_err(|e| MulticallError::InvalidType {
                ty: ty.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn resolve_signature(signature: &str, args: &[Value]) -> Result<ResolvedTypes> {
    let groups = paren_groups(signature);
    let Some(arg_group) = groups.first() else {
        return Err(MulticallError::InvalidSignature(signature.to_string()));
    };
    let name = signature[..signature.find('(').unwrap_or(0)].trim();
    if name.is_empty() {
        return Err(MulticallError::InvalidSignature(signature.to_string()));
    }

    let arg_types = split_types(arg_group);
    if arg_types.len() != args.len() {
        return Err(MulticallError::MalformedCallArguments {
            method: signature.to_string(),
            types: arg_types.iter().map(|ty| ty.to_string()).collect(),
            values: args.to_vec(),
        });
    }
    let return_types = groups.get(1).map(|group| split_types(group)).unwrap_or_default();

    Ok(ResolvedTypes {
        method: format!("{name}({})", arg_types.join(",")),
        arg_types: parse_types(&arg_types)?,
        return_types: parse_types(&return_types)?,
        function: None,
    })
}

// ============================================
// ABI mode
// ============================================

fn resolve_abi(abi: &JsonAbi, method: &str, args: &[Value]) -> Result<ResolvedTypes> {
    let overloads = abi
        .function(method)
        .filter(|overloads| !overloads.is_empty())
        .ok_or_else(|| MulticallError::UnknownMethod(method.to_string()))?;

    let Some(function) = overloads.iter().find(|f| f.inputs.len() == args.len()) else {
        return Err(MulticallError::MalformedCallArguments {
            method: overloads[0].signature(),
            types: overloads[0]
                .inputs
                .iter()
                .map(|param| param.selector_type().into_owned())
                .collect(),
            values: args.to_vec(),
        });
    };

    let input_types: Vec<String> = function
        .inputs
        .iter()
        .map(|param| param.selector_type().into_owned())
        .collect();
    let output_types: Vec<String> = function
        .outputs
        .iter()
        .map(|param| param.selector_type().into_owned())
        .collect();

    Ok(ResolvedTypes {
        method: function.signature(),
        arg_types: parse_types(&input_types.iter().map(String::as_str).collect::<Vec<_>>())?,
        return_types: parse_types(&output_types.iter().map(String::as_str).collect::<Vec<_>>())?,
        function: Some(function.clone()),
    })
}
