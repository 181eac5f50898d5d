//! Async port traits the differ and worker orchestrators drive.
//!
//! Every external collaborator — the feature-data API, the persisted-state
//! store, blob storage, and the downstream publisher — is consumed through
//! one of these traits. Concrete adapters live in `wsn-store`.

pub mod blob_store;
pub mod feature_fetcher;
pub mod publisher;
pub mod repository;

pub use blob_store::BlobStore;
pub use feature_fetcher::FeatureFetcher;
pub use publisher::Publisher;
pub use repository::{NotificationEvent, Repository, SavedSearch, SavedSearchState, StateUpdate};
