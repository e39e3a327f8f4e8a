use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// Transport and database failures have their own error types
/// (`TransportError`, `sqlx::Error`); this covers the domain rules the
/// engine itself enforces.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity referenced by ID does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },
}
