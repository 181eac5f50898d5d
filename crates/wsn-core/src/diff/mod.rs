//! Feature-set diffing: comparator, history reconciler, sorting, and summary.
//!
//! ## Pipeline
//!
//! ```ignore
//! let unreconciled = comparator::compare(&old, &new);
//! let mut reconciled = reconciler::reconcile(unreconciled, &oracle).await?;
//! sorting::sort_diff_lists(&mut reconciled);
//! let summary = summary::summarize(&reconciled, query_changed);
//! ```
//!
//! ## Guarantees
//!
//! - **Quiet rollout**: the comparator never emits a change for a leaf whose
//!   prior value was absent.
//! - **Determinism**: [`sorting::sort_diff_lists`] imposes a total order so
//!   identical inputs always produce byte-identical encoded diffs.
//! - **No partial state**: moves and splits are fully resolved before the
//!   diff is sorted or summarized; added/removed lists never contain a move
//!   or split target afterward.

pub mod comparator;
pub mod model;
pub mod reconciler;
pub mod sorting;
pub mod summary;

pub use comparator::compare;
pub use model::{
    AddReason, AddedEntry, BaselineValue, BrowserEntryValue, Change, ModifiedEntry, MoveEntry,
    ReconciledDelta, RemoveReason, RemovedEntry, SplitEntry, UnreconciledDelta,
};
pub use reconciler::{reconcile, FeatureOracle, OracleOutcome};
pub use sorting::sort_diff_lists;
pub use summary::{summarize, Counters, Reason, Summary};
