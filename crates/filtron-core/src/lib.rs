//! Filtron core - schema catalog, path resolution, predicate building, and
//! query execution.
//!
//! The central type is [`PredicateBuilder`]: a fluent accumulator of filter
//! fragments scoped to one catalog entity. Fragments combine with AND by
//! default, `or` merges with the most recently added fragment, and `build`
//! folds the sequence into a single [`Predicate`](filtron_model::Predicate)
//! for the [`QueryEngine`] (or any other consumer honoring the same
//! contract).
//!
//! ```
//! use filtron_core::builder::PredicateBuilder;
//! use filtron_core::catalog::{Catalog, EntityDef, ScalarType};
//!
//! # fn main() -> Result<(), filtron_core::Error> {
//! let catalog = Catalog::new().with_entity(
//!     EntityDef::new("User", "id")
//!         .with_scalar("id", ScalarType::Int64)
//!         .with_scalar("username", ScalarType::String)
//!         .with_scalar("age", ScalarType::Int32),
//! );
//!
//! let predicate = PredicateBuilder::new(&catalog, "User")?
//!     .eq("username", "john")?
//!     .gt("age", 18)?
//!     .like("username", "jo")?
//!     .build();
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod path;

pub use builder::PredicateBuilder;
pub use catalog::{Catalog, Cardinality, EntityDef, FieldDef, FieldType, RelationDef, ScalarType};
pub use engine::{EntityRow, MemoryStore, QueryContext, QueryEngine};
pub use error::Error;
pub use path::{JoinedPath, PathStep, ResolvedPath, StepKind};

/// Re-export model types.
pub use filtron_model as model;
