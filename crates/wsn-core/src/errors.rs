//! Structured error facility
//!
//! Provides a single error type used across the differ and worker
//! orchestrators, with a stable, programmatically-queryable classification
//! into `Fatal` (ack/stop the job) and `Transient` (propagate for retry).

use wsn_core_types::{RequestId, TraceId};

/// Result type alias using [`DifferError`]
pub type Result<T> = std::result::Result<T, DifferError>;

/// Top-level effect of an error: whether the driving queue should retry
/// the job or treat it as permanently failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Ack/stop the job; retrying would not help (corrupt state, bad schema).
    Fatal,
    /// Propagate to the queue for retry (network, lock, I/O failures).
    Transient,
}

/// Canonical error kind taxonomy for the event producer worker.
///
/// Each kind maps to a stable error code via [`ErrorKind::code`] and to an
/// [`ErrorClass`] via [`ErrorKind::class`] — this is the concrete
/// implementation of the two-level Fatal/Transient taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Snapshot codec errors (fatal — §4.B)
    WrongKind,
    UnknownVersion,
    MigrationPathNotFound,
    MigrationCycle,
    MalformedBlob,
    DuplicateMigration,

    // Diff blob errors (fatal)
    MalformedDiff,

    // External collaborator errors (transient — §7)
    FetcherError,
    OracleError,
    RepositoryError,
    BlobStoreError,
    PublisherError,
    LockError,

    // Internal
    Internal,
}

impl ErrorKind {
    /// Stable error code, suitable for logs and external reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::WrongKind => "ERR_WRONG_KIND",
            ErrorKind::UnknownVersion => "ERR_UNKNOWN_VERSION",
            ErrorKind::MigrationPathNotFound => "ERR_MIGRATION_PATH_NOT_FOUND",
            ErrorKind::MigrationCycle => "ERR_MIGRATION_CYCLE",
            ErrorKind::MalformedBlob => "ERR_MALFORMED_BLOB",
            ErrorKind::DuplicateMigration => "ERR_DUPLICATE_MIGRATION",
            ErrorKind::MalformedDiff => "ERR_MALFORMED_DIFF",
            ErrorKind::FetcherError => "ERR_FETCHER",
            ErrorKind::OracleError => "ERR_ORACLE",
            ErrorKind::RepositoryError => "ERR_REPOSITORY",
            ErrorKind::BlobStoreError => "ERR_BLOB_STORE",
            ErrorKind::PublisherError => "ERR_PUBLISHER",
            ErrorKind::LockError => "ERR_LOCK",
            ErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind should stop the job (`Fatal`) or let the queue
    /// retry it (`Transient`). See spec §7.
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::WrongKind
            | ErrorKind::UnknownVersion
            | ErrorKind::MigrationPathNotFound
            | ErrorKind::MigrationCycle
            | ErrorKind::MalformedBlob
            | ErrorKind::DuplicateMigration
            | ErrorKind::MalformedDiff => ErrorClass::Fatal,

            ErrorKind::FetcherError
            | ErrorKind::OracleError
            | ErrorKind::RepositoryError
            | ErrorKind::BlobStoreError
            | ErrorKind::PublisherError
            | ErrorKind::LockError => ErrorClass::Transient,

            ErrorKind::Internal => ErrorClass::Fatal,
        }
    }
}

/// Canonical structured error type carried through the differ and worker.
#[derive(Debug, Clone)]
pub struct DifferError {
    kind: ErrorKind,
    op: Option<String>,
    search_id: Option<String>,
    snapshot_type: Option<String>,
    event_id: Option<String>,
    worker_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<DifferError>>,
}

impl DifferError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            op: None,
            search_id: None,
            snapshot_type: None,
            event_id: None,
            worker_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_search_id(mut self, id: impl Into<String>) -> Self {
        self.search_id = Some(id.into());
        self
    }

    pub fn with_snapshot_type(mut self, snapshot_type: impl Into<String>) -> Self {
        self.snapshot_type = Some(snapshot_type.into());
        self
    }

    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn with_worker_id(mut self, id: impl Into<String>) -> Self {
        self.worker_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: DifferError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn search_id(&self) -> Option<&str> {
        self.search_id.as_deref()
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&DifferError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for DifferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}", self.code(), self.kind)?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(search_id) = &self.search_id {
            write!(f, " (search_id: {})", search_id)?;
        }
        if let Some(event_id) = &self.event_id {
            write!(f, " (event_id: {})", event_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for DifferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<serde_json::Error> for DifferError {
    fn from(err: serde_json::Error) -> Self {
        DifferError::new(ErrorKind::MalformedBlob).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ErrorKind::WrongKind, "ERR_WRONG_KIND"),
            (ErrorKind::MigrationCycle, "ERR_MIGRATION_CYCLE"),
            (ErrorKind::FetcherError, "ERR_FETCHER"),
            (ErrorKind::LockError, "ERR_LOCK"),
        ];
        for (kind, expected) in cases {
            assert_eq!(kind.code(), expected);
        }
    }

    #[test]
    fn test_error_classification_matches_spec() {
        for fatal in [
            ErrorKind::WrongKind,
            ErrorKind::UnknownVersion,
            ErrorKind::MigrationPathNotFound,
            ErrorKind::MigrationCycle,
            ErrorKind::MalformedBlob,
            ErrorKind::MalformedDiff,
        ] {
            assert_eq!(fatal.class(), ErrorClass::Fatal, "{:?}", fatal);
        }
        for transient in [
            ErrorKind::FetcherError,
            ErrorKind::OracleError,
            ErrorKind::RepositoryError,
            ErrorKind::BlobStoreError,
            ErrorKind::PublisherError,
            ErrorKind::LockError,
        ] {
            assert_eq!(transient.class(), ErrorClass::Transient, "{:?}", transient);
        }
    }

    #[test]
    fn test_builder_roundtrip() {
        let err = DifferError::new(ErrorKind::FetcherError)
            .with_op("fetch_features")
            .with_search_id("s1")
            .with_message("timeout");
        assert_eq!(err.op(), Some("fetch_features"));
        assert_eq!(err.search_id(), Some("s1"));
        assert_eq!(err.class(), ErrorClass::Transient);
        assert!(err.to_string().contains("timeout"));
    }
}
