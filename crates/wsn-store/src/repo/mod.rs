//! SQLite-backed [`Repository`](wsn_core::ports::Repository) adapter

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepository;
