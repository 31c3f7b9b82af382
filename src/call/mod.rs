//! Call normalization.
//!
//! A [`Call`] is what callers write; a [`CallDescriptor`] is the canonical
//! form the envelope builder and decoder work with. [`TypeResolver`] decides
//! where argument and return types come from.

mod builder;
mod descriptor;
mod resolver;

pub use builder::{Call, ReturnField, Transform};
pub use descriptor::CallDescriptor;
pub use resolver::{normalize, ResolvedTypes, TypeResolver};
