use alloy::primitives::Bytes;
use moka::sync::Cache;

/// Key/value store for encoded envelopes.
///
/// Implementations must tolerate concurrent readers and writers. Two
/// invocations racing on the same missing key may both encode and insert;
/// both produce the same bytes.
pub trait EnvelopeStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Bytes>;
    fn insert(&self, key: String, envelope: Bytes);
}

impl EnvelopeStore for Cache<String, Bytes> {
    fn get(&self, key: &str) -> Option<Bytes> {
        Cache::get(self, key)
    }

    fn insert(&self, key: String, envelope: Bytes) {
        Cache::insert(self, key, envelope)
    }
}

/// Store that never evicts.
pub fn unbounded_store() -> Cache<String, Bytes> {
    Cache::builder().build()
}

/// Store holding at most `capacity` envelopes.
pub fn bounded_store(capacity: u64) -> Cache<String, Bytes> {
    Cache::builder().max_capacity(capacity).build()
}
