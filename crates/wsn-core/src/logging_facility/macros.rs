//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use wsn_core::log_op_start;
/// log_op_start!("process_job");
/// log_op_start!("process_job", search_id = "s1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use wsn_core::log_op_end;
/// log_op_end!("process_job", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use wsn_core::{log_op_error, errors::{DifferError, ErrorKind}};
/// let err = DifferError::new(ErrorKind::FetcherError);
/// log_op_error!("fetch_features", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let diff_err: &$crate::errors::DifferError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?diff_err.kind(),
            err_code = diff_err.code(),
            err_class = ?diff_err.class(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let diff_err: &$crate::errors::DifferError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = wsn_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?diff_err.kind(),
            err_code = diff_err.code(),
            err_class = ?diff_err.class(),
            $($field)*
        );
    }};
}
