use alloy::dyn_abi::{DynSolType, DynSolValue};

use crate::utils::display_value;

/// Post-processing applied to a decoded return field, chosen by its declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// `bool`: true only when the value prints exactly as `"true"`
    Bool,
    PassThrough,
}

impl From<&DynSolType> for FieldKind {
    fn from(ty: &DynSolType) -> Self {
        match ty {
            DynSolType::Bool => Self::Bool,
            _ => Self::PassThrough,
        }
    }
}

impl FieldKind {
    pub fn normalize(self, value: DynSolValue) -> DynSolValue {
        match self {
            // Compares the printed form, not the decoded flag. Anything that
            // does not print as exactly "true" becomes false.
            Self::Bool => DynSolValue::Bool(display_value(&value) == "true"),
            Self::PassThrough => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(FieldKind::from(&DynSolType::Bool), FieldKind::Bool);
        assert_eq!(FieldKind::from(&DynSolType::Uint(256)), FieldKind::PassThrough);
        assert_eq!(
            FieldKind::from(&DynSolType::Array(Box::new(DynSolType::Bool))),
            FieldKind::PassThrough
        );
    }

    #[test]
    fn test_bool_coercion_is_string_based() {
        assert_eq!(
            FieldKind::Bool.normalize(DynSolValue::Bool(true)),
            DynSolValue::Bool(true)
        );
        assert_eq!(
            FieldKind::Bool.normalize(DynSolValue::Bool(false)),
            DynSolValue::Bool(false)
        );
        // A truthy non-bool does not print as "true"
        assert_eq!(
            FieldKind::Bool.normalize(DynSolValue::Uint(U256::from(1), 256)),
            DynSolValue::Bool(false)
        );
        assert_eq!(
            FieldKind::Bool.normalize(DynSolValue::String("true".into())),
            DynSolValue::Bool(true)
        );
        assert_eq!(
            FieldKind::Bool.normalize(DynSolValue::String("TRUE".into())),
            DynSolValue::Bool(false)
        );
    }

    #[test]
    fn test_pass_through_untouched() {
        let value = DynSolValue::Uint(U256::from(1), 256);

        assert_eq!(FieldKind::PassThrough.normalize(value.clone()), value);
    }
}
