mod builder;
mod store;

pub use builder::{encode_call_data, EnvelopeBuilder};
pub use store::{bounded_store, unbounded_store, EnvelopeStore};
