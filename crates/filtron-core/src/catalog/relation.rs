//! Relation definitions between entities.

use serde::{Deserialize, Serialize};

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// One-to-one relation (unique foreign key).
    OneToOne,
    /// One-to-many relation (foreign key on many side).
    OneToMany,
    /// Many-to-many relation (requires an edge/join entity).
    ManyToMany,
}

impl Cardinality {
    /// Check if traversing this relation can reach more than one record.
    pub fn is_to_many(&self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }
}

/// A relation definition between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Relation name (unique among relations of the source entity).
    pub name: String,
    /// Source entity name.
    pub from_entity: String,
    /// Target entity name.
    pub to_entity: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// For one-to-one/one-to-many: field on the source entity the relation
    /// is anchored on. For many-to-many: edge-entity column referencing the
    /// source identity.
    pub from_field: String,
    /// For one-to-one/one-to-many: field on the target entity that
    /// `from_field` references. For many-to-many: edge-entity column
    /// referencing the target identity.
    pub to_field: String,
    /// Edge entity for many-to-many relations.
    pub edge_entity: Option<String>,
}

impl RelationDef {
    /// Create a one-to-one relation.
    pub fn one_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality: Cardinality::OneToOne,
            from_field: from_field.into(),
            to_field: to_field.into(),
            edge_entity: None,
        }
    }

    /// Create a one-to-many relation.
    pub fn one_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality: Cardinality::OneToMany,
            from_field: from_field.into(),
            to_field: to_field.into(),
            edge_entity: None,
        }
    }

    /// Create a many-to-many relation through an edge entity.
    pub fn many_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
        edge_entity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality: Cardinality::ManyToMany,
            from_field: from_field.into(),
            to_field: to_field.into(),
            edge_entity: Some(edge_entity.into()),
        }
    }
}
