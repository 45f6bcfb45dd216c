//! Query-execution engine.
//!
//! This module implements the collaborator contract a composed
//! [`Predicate`](filtron_model::Predicate) is handed to: evaluating it
//! against a backing store, honoring the duplicate-elimination request
//! raised by join traversal, and returning matching rows, optionally
//! paginated and sorted.

mod context;
mod eval;
mod executor;
mod store;

pub use context::QueryContext;
pub use eval::{FragmentEvaluator, FragmentMatch};
pub use executor::QueryEngine;
pub use store::{EntityRow, MemoryStore};
