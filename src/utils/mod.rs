//! Utility functions for the multicall client.
//!
//! - [`conversion`] - JSON argument coercion and hex formatting

mod conversion;

pub use conversion::{coerce_json, display_value, hex_encode};
