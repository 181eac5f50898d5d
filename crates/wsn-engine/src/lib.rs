//! wsn-engine — orchestration layer
//!
//! Provides the differ and worker orchestrators that coordinate the
//! wsn-core domain logic with the wsn-store adapters, plus process-wide
//! configuration loading.

pub mod config;
pub mod differ;
pub mod worker;

pub use config::AppConfig;
pub use differ::{DiffResult, Differ, RunInput};
pub use worker::{Job, Worker, WorkerConfig};
