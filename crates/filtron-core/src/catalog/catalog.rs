//! The catalog - schema metadata for an entity graph.

use std::collections::HashMap;

use super::entity::EntityDef;
use super::relation::RelationDef;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Schema metadata for a set of entities and the relations between them.
///
/// The catalog is the metadata collaborator of the path resolver: for a
/// given entity and segment name it answers whether the segment is a scalar
/// field (dereference) or a relation (joinable, with cardinality), and for
/// relations, which entity to continue resolution against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Entity definitions keyed by name.
    entities: HashMap<String, EntityDef>,
    /// Relation definitions keyed by (source entity, relation name).
    relations: HashMap<(String, String), RelationDef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the catalog.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Add a relation to the catalog.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.insert(
            (relation.from_entity.clone(), relation.name.clone()),
            relation,
        );
        self
    }

    /// Get an entity by name.
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get an entity by name, failing with [`Error::UnknownEntity`].
    pub fn require_entity(&self, name: &str) -> Result<&EntityDef, Error> {
        self.entity(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Look up a relation by source entity and relation name.
    pub fn relation_of(&self, entity: &str, name: &str) -> Option<&RelationDef> {
        self.relations.get(&(entity.to_string(), name.to_string()))
    }

    /// All relations whose source is the given entity.
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.from_entity == entity)
            .collect()
    }
}
