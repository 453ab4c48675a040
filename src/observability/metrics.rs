//! Metric descriptions.
//!
//! Metrics are emitted through the `metrics` facade; without an installed
//! recorder they are no-ops. Embedding applications install their own.

use metrics::{Unit, describe_counter, describe_histogram};

/// Export requests, labelled by `format` and `outcome`.
pub const EXPORT_REQUESTS_TOTAL: &str = "export_requests_total";
/// Wall time per export request.
pub const EXPORT_DURATION_MS: &str = "export_duration_ms";
/// Records read for exports, labelled by `category`.
pub const EXPORT_ROWS_TOTAL: &str = "export_rows_total";
/// Exports that showed a partial view, labelled by `format`.
pub const EXPORT_TRUNCATED_TOTAL: &str = "export_truncated_total";
/// `SQLite` operations, labelled by `backend`, `operation` and `status`.
pub const STORAGE_OPERATIONS_TOTAL: &str = "storage_operations_total";
/// `SQLite` operation latency.
pub const STORAGE_OPERATION_DURATION_MS: &str = "storage_operation_duration_ms";
/// Poisoned connection mutexes that were recovered.
pub const SQLITE_POISON_RECOVERY_TOTAL: &str = "sqlite_mutex_poison_recovery_total";

/// Registers units and descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(EXPORT_REQUESTS_TOTAL, "Export requests by format and outcome");
    describe_histogram!(
        EXPORT_DURATION_MS,
        Unit::Milliseconds,
        "Time to build one export"
    );
    describe_counter!(EXPORT_ROWS_TOTAL, "Records read for exports");
    describe_counter!(
        EXPORT_TRUNCATED_TOTAL,
        "Exports rendered as a partial view"
    );
    describe_counter!(STORAGE_OPERATIONS_TOTAL, "Record storage operations");
    describe_histogram!(
        STORAGE_OPERATION_DURATION_MS,
        Unit::Milliseconds,
        "Record storage operation latency"
    );
    describe_counter!(
        SQLITE_POISON_RECOVERY_TOTAL,
        "Recovered poisoned SQLite connection locks"
    );
}
