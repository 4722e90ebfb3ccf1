//! Per-entity query modules
//!
//! Relationships are resolved with query-by-foreign-key; there are no
//! in-memory object graphs or back-references.

pub mod releases;
pub mod splits;
pub mod users;

/// Wrap a row-field parse failure as a column decode error.
pub(crate) fn decode_err(
    column: &str,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: err.into(),
    }
}
