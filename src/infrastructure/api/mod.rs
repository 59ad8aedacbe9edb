//! Remote API client implementations

mod http;

pub use http::HttpApiClient;
