//! Decoding of `aggregate` responses.
//!
//! [`map_results`] produces keyed raw/transformed mappings for the batch,
//! [`decode_native`] returns each call's decoded values untouched.

mod coerce;
mod mapper;

pub use coerce::FieldKind;
pub use mapper::{
    decode_native, decode_response, map_results, AggregateOutput, AggregateResult,
    BatchResponse, DecodedBatch,
};
