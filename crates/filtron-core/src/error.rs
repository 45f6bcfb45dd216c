//! Core error types.

use filtron_model::ValueKind;
use thiserror::Error;

/// Predicate-construction and query-execution errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested root entity is not in the catalog.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// A path segment does not name a field or relation of the type reached
    /// so far.
    #[error("cannot resolve segment `{segment}` of path `{path}` on entity `{entity}`")]
    PathResolution {
        /// Entity the failing segment was resolved against.
        entity: String,
        /// Full dot-separated path being resolved.
        path: String,
        /// The segment that failed to resolve.
        segment: String,
    },

    /// A join-variant operator's first segment does not name a relation.
    #[error("segment `{segment}` on entity `{entity}` is not a relation and cannot be joined")]
    NotARelation {
        /// Entity the segment was resolved against.
        entity: String,
        /// The offending first segment.
        segment: String,
    },

    /// A supplied literal's type is incompatible with the resolved field.
    #[error("type mismatch on `{path}`: field is {expected}, got {actual} literal")]
    TypeMismatch {
        /// Path whose terminal field was type-checked.
        path: String,
        /// Description of the field type.
        expected: String,
        /// Kind of the offending literal.
        actual: ValueKind,
    },

    /// A sort or projection referenced a field the entity does not have.
    #[error("unknown field `{field}` on entity `{entity}`")]
    UnknownField {
        /// Entity that was inspected.
        entity: String,
        /// The missing field name.
        field: String,
    },
}
