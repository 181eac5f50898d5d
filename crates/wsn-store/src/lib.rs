//! wsn-store — adapters implementing the wsn-core ports
//!
//! Provides:
//! - SQLite schema with a migrations framework
//! - A filesystem-backed [`BlobStore`](wsn_core::ports::BlobStore)
//! - A SQLite-backed [`Repository`](wsn_core::ports::Repository)
//! - An HTTP [`FeatureFetcher`](wsn_core::ports::FeatureFetcher)
//! - In-memory stand-ins for all four ports, for tests and local runs

pub mod cas;
pub mod errors;
pub mod http_fetcher;
pub mod in_memory;
pub mod migrations;
pub mod repo;

pub use cas::FsBlobStore;
pub use errors::Result;
pub use http_fetcher::HttpFeatureFetcher;
pub use repo::SqliteRepository;
