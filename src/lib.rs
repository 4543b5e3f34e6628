//! laddersync library
//!
//! Exposes the route builders, API client, storage, and sync orchestration
//! for use by the CLI binary and integration tests.

pub mod config;
pub mod models;
pub mod riot;
pub mod storage;
pub mod sync;
