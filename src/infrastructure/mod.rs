//! Infrastructure - concrete implementations of the domain seams

pub mod api;
pub mod cache;
pub mod logging;
pub mod repository;
pub mod retry;
