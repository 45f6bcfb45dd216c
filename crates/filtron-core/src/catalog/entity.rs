//! Entity definitions.

use super::field::FieldDef;
use super::types::ScalarType;
use serde::{Deserialize, Serialize};

/// An entity definition (one row/record kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (unique within the catalog).
    pub name: String,
    /// Name of the primary identity field.
    pub identity_field: String,
    /// Field definitions.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>, identity_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity_field: identity_field.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a non-nullable scalar field.
    pub fn with_scalar(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_field(FieldDef::new(name, scalar))
    }

    /// Add a nullable scalar field.
    pub fn with_optional(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_field(FieldDef::optional(name, scalar))
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the identity field definition.
    pub fn get_identity_field(&self) -> Option<&FieldDef> {
        self.get_field(&self.identity_field)
    }
}
