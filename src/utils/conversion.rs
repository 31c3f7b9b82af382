//! Conversions between caller-supplied JSON values and ABI values.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::hex;
use serde_json::Value;

// ============================================
// Hex Encoding
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================
// JSON -> ABI
// ============================================

/// Coerce a raw JSON argument into a value of the given Solidity type.
///
/// JSON arrays map onto arrays and tuples element by element. Every other
/// value goes through its string form, so `500`, `"500"` and `"0x1f4"` are
/// all accepted for `uint256`, and addresses may omit the `0x` prefix.
pub fn coerce_json(ty: &DynSolType, value: &Value) -> Result<DynSolValue, alloy::dyn_abi::Error> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_json(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) if items.len() == *len => items
            .iter()
            .map(|item| coerce_json(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::FixedArray),
        (DynSolType::Tuple(types), Value::Array(items)) if items.len() == types.len() => types
            .iter()
            .zip(items)
            .map(|(ty, item)| coerce_json(ty, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Tuple),
        (_, Value::String(s)) => ty.coerce_str(s),
        (_, other) => ty.coerce_str(&other.to_string()),
    }
}

// ============================================
// ABI -> String
// ============================================

/// Render a decoded value the way it prints as text.
///
/// Numbers print in decimal, addresses checksummed, byte strings as 0x-hex,
/// and sequences as their elements joined by commas.
pub fn display_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::FixedBytes(word, size) => hex_encode(&word[..*size]),
        DynSolValue::Bytes(b) => hex_encode(b),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().map(display_value).collect::<Vec<_>>().join(",")
        },
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use serde_json::json;

    #[test]
    fn test_coerce_numbers_and_strings() {
        let uint = DynSolType::Uint(256);

        assert_eq!(
            coerce_json(&uint, &json!(500)).unwrap(),
            DynSolValue::Uint(U256::from(500), 256)
        );
        assert_eq!(
            coerce_json(&uint, &json!("500")).unwrap(),
            DynSolValue::Uint(U256::from(500), 256)
        );
        assert!(coerce_json(&uint, &json!(null)).is_err());
    }

    #[test]
    fn test_coerce_address_without_prefix() {
        let value = coerce_json(
            &DynSolType::Address,
            &json!("0000000000000000000000000000000000000001"),
        )
        .unwrap();

        assert_eq!(value, DynSolValue::Address(Address::with_last_byte(1)));
    }

    #[test]
    fn test_coerce_nested_arrays() {
        let ty = DynSolType::parse("(uint256,bool)[]").unwrap();
        let value = coerce_json(&ty, &json!([[1, true], ["2", "false"]])).unwrap();

        assert_eq!(
            value,
            DynSolValue::Array(vec![
                DynSolValue::Tuple(vec![
                    DynSolValue::Uint(U256::from(1), 256),
                    DynSolValue::Bool(true)
                ]),
                DynSolValue::Tuple(vec![
                    DynSolValue::Uint(U256::from(2), 256),
                    DynSolValue::Bool(false)
                ]),
            ])
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&DynSolValue::Bool(true)), "true");
        assert_eq!(display_value(&DynSolValue::Uint(U256::from(42), 256)), "42");
        assert_eq!(display_value(&DynSolValue::Bytes(vec![0xab, 0xcd])), "0xabcd");
        assert_eq!(
            display_value(&DynSolValue::Array(vec![
                DynSolValue::Bool(false),
                DynSolValue::Uint(U256::from(7), 8)
            ])),
            "false,7"
        );
    }
}
