//! Storage operation metrics.

use crate::observability::metrics::{STORAGE_OPERATION_DURATION_MS, STORAGE_OPERATIONS_TOTAL};
use std::time::Instant;

/// Records `storage_operations_total` and `storage_operation_duration_ms`
/// for one source operation.
///
/// `status` is `"success"` or `"error"`.
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        STORAGE_OPERATIONS_TOTAL,
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        STORAGE_OPERATION_DURATION_MS,
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}
