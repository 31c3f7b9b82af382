pub mod multicall;

pub use multicall::{IMulticall, McCall};
