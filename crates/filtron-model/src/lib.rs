//! Filtron model types.
//!
//! This crate defines the data model shared between predicate construction
//! and query execution:
//!
//! # Modules
//!
//! - [`value`] - Runtime value types for filter criteria
//! - [`fragment`] - Predicate fragment IR (one condition per operator call)
//! - [`predicate`] - Composed predicates (conjunction of fragments)
//! - [`page`] - Pagination and sorting parameters
//!
//! All types derive `serde::Serialize` / `serde::Deserialize`, so predicates
//! and page requests can be logged, cached, or carried across process
//! boundaries as plain data.

pub mod fragment;
pub mod page;
pub mod predicate;
pub mod value;

// Re-export commonly used types at crate root
pub use fragment::{CompareOp, Fragment, JoinCondition, JoinKind, TextMatch};
pub use page::{Page, PageRequest, SortDirection, SortSpec};
pub use predicate::Predicate;
pub use value::{Value, ValueKind};
