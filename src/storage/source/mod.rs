//! Record source implementations.

mod mock;
mod sqlite;

pub use mock::{MOCK_ORDER_COUNT, MockRecordSource};
pub use sqlite::SqliteRecordSource;
