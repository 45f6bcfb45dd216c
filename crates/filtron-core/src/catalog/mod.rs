//! Schema catalog.
//!
//! The catalog stores metadata about entities, their fields, and the
//! relations between them. The path resolver consults it to validate
//! dot-separated field paths and to find join targets.

mod catalog;
mod entity;
mod field;
mod relation;
mod types;

pub use catalog::Catalog;
pub use entity::EntityDef;
pub use field::FieldDef;
pub use relation::{Cardinality, RelationDef};
pub use types::{FieldType, ScalarType};
