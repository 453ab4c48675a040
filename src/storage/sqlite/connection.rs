//! Connection handling.

use crate::Result;
use crate::observability::metrics::SQLITE_POISON_RECOVERY_TOTAL;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Locks the connection mutex, recovering from poison.
///
/// A panic while holding the lock leaves the connection itself usable, so the
/// inner value is taken back and the event is logged and counted.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Mutex;
/// use backoffice_export::storage::sqlite::acquire_lock;
///
/// let mutex = Mutex::new(connection);
/// let conn = acquire_lock(&mutex);
/// ```
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!(SQLITE_POISON_RECOVERY_TOTAL).increment(1);
            poisoned.into_inner()
        },
    }
}

/// Applies connection pragmas.
///
/// WAL journal, `NORMAL` synchronous and a 5 second busy timeout. Pragma
/// results are ignored: `journal_mode` answers with a row, and an in-memory
/// database silently keeps its own journal mode.
///
/// # Errors
///
/// Currently infallible; returns `Result` so callers can `?` it alongside
/// schema setup.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", "5000");
    Ok(())
}
