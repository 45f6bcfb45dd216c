//! Path resolution over the entity graph.
//!
//! A field path is a dot-separated sequence of segments
//! (`"address.city.name"`). Each segment must name a field or a relation of
//! the type reached by the previous segment. Plain resolution dereferences
//! relations without join semantics; join resolution requires the first
//! segment to name a relation and is what later triggers duplicate-row
//! elimination at materialization time.

use crate::catalog::{Catalog, FieldType, RelationDef};
use crate::error::Error;
use filtron_model::JoinKind;

/// One resolved segment of a field path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// Segment name.
    pub name: String,
    /// What the segment resolved to.
    pub kind: StepKind,
}

/// Classification of a resolved path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// A scalar field of the entity reached so far.
    Attribute(FieldType),
    /// A relation, dereferenced to its target entity.
    Relation(RelationDef),
}

/// A fully resolved field path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    /// Entity the first segment was resolved against.
    pub root_entity: String,
    /// The raw dot-separated path.
    pub raw: String,
    /// Resolved segments, in path order.
    pub steps: Vec<PathStep>,
}

impl ResolvedPath {
    /// Field type of the terminal segment, when the path ends on a field.
    pub fn terminal_type(&self) -> Option<FieldType> {
        match self.steps.last()?.kind {
            StepKind::Attribute(field_type) => Some(field_type),
            StepKind::Relation(_) => None,
        }
    }
}

/// A path resolved through an explicit relationship join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPath {
    /// The relation named by the first segment.
    pub relation: RelationDef,
    /// Join kind requested by the caller.
    pub kind: JoinKind,
    /// Remaining segments, resolved against the relation's target entity.
    /// Empty when the path is the relation name alone.
    pub rest: ResolvedPath,
}

/// Resolve a dot-separated field path against an entity.
///
/// Each segment walks one field or relation; relations are dereferenced
/// without join semantics. Fails with [`Error::PathResolution`] naming the
/// first segment that does not exist on the entity reached so far.
pub fn resolve(catalog: &Catalog, entity: &str, path: &str) -> Result<ResolvedPath, Error> {
    let mut steps = Vec::new();
    let mut current = catalog.require_entity(entity)?;
    let mut terminal_reached = false;

    for segment in path.split('.') {
        if segment.is_empty() || terminal_reached {
            return Err(Error::PathResolution {
                entity: current.name.clone(),
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }

        if let Some(field) = current.get_field(segment) {
            steps.push(PathStep {
                name: segment.to_string(),
                kind: StepKind::Attribute(field.field_type),
            });
            // A scalar field ends the walk; further segments cannot resolve.
            terminal_reached = true;
        } else if let Some(relation) = catalog.relation_of(&current.name, segment) {
            steps.push(PathStep {
                name: segment.to_string(),
                kind: StepKind::Relation(relation.clone()),
            });
            current = catalog.require_entity(&relation.to_entity)?;
        } else {
            return Err(Error::PathResolution {
                entity: current.name.clone(),
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
    }

    if steps.is_empty() {
        return Err(Error::PathResolution {
            entity: entity.to_string(),
            path: path.to_string(),
            segment: String::new(),
        });
    }

    Ok(ResolvedPath {
        root_entity: entity.to_string(),
        raw: path.to_string(),
        steps,
    })
}

/// Resolve a path whose first segment performs an explicit relationship
/// traversal of the given kind.
///
/// The first segment must name a relation of the root entity
/// ([`Error::NotARelation`] otherwise); the remaining segments resolve
/// against the relation's target entity via [`resolve`].
pub fn resolve_join(
    catalog: &Catalog,
    entity: &str,
    path: &str,
    kind: JoinKind,
) -> Result<JoinedPath, Error> {
    let root = catalog.require_entity(entity)?;
    let (first, rest) = match path.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    };

    let relation = catalog.relation_of(&root.name, first).ok_or_else(|| {
        Error::NotARelation {
            entity: root.name.clone(),
            segment: first.to_string(),
        }
    })?;

    let rest = match rest {
        Some(rest) => resolve(catalog, &relation.to_entity, rest)?,
        None => ResolvedPath {
            root_entity: relation.to_entity.clone(),
            raw: String::new(),
            steps: Vec::new(),
        },
    };

    Ok(JoinedPath {
        relation: relation.clone(),
        kind,
        rest,
    })
}
