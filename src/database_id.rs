//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
///
/// IDs are assigned by the store when a record is created and are never reused
/// by the in-memory store.
pub type DatabaseId = i64;
