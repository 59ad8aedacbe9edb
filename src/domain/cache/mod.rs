//! Caching abstraction - trait seam and key construction

pub mod key;
mod store;

pub use store::{Cache, CacheExt};
