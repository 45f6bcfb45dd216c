//! In-memory backing store for query execution.

use std::collections::HashMap;

use filtron_model::Value;

/// One entity record as a list of named field values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityRow {
    /// Field values, in insertion order.
    pub fields: Vec<(String, Value)>,
}

impl EntityRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field value (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// A trivial in-memory store: one row list per entity name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<EntityRow>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row for an entity.
    pub fn insert(&mut self, entity: impl Into<String>, row: EntityRow) {
        self.tables.entry(entity.into()).or_default().push(row);
    }

    /// All rows of an entity, empty when none were inserted.
    pub fn rows(&self, entity: &str) -> &[EntityRow] {
        self.tables.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}
