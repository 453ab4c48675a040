//! Storage traits.

mod source;

pub use source::RecordSource;
