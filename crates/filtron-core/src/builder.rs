//! Fluent predicate construction.
//!
//! [`PredicateBuilder`] accumulates filter fragments for one root entity and
//! folds them into a single [`Predicate`] via [`build`](PredicateBuilder::build).
//! Fragments combine with AND by default; [`or`](PredicateBuilder::or) merges
//! its argument with the most recently added fragment only.
//!
//! Every operator that takes a comparison value is a no-op when the value is
//! absent (`Value::Null`, which `Option<T>` converts into) or, for text
//! operators, empty, and for collections, when the collection is empty. This
//! lets optional filter criteria be passed straight through without
//! branching:
//!
//! ```
//! use filtron_core::builder::PredicateBuilder;
//! use filtron_core::catalog::{Catalog, EntityDef, ScalarType};
//!
//! # fn main() -> Result<(), filtron_core::Error> {
//! let catalog = Catalog::new().with_entity(
//!     EntityDef::new("User", "id")
//!         .with_scalar("id", ScalarType::Uuid)
//!         .with_scalar("status", ScalarType::String)
//!         .with_scalar("age", ScalarType::Int32),
//! );
//!
//! let min_age: Option<i32> = None; // unset criterion
//! let predicate = PredicateBuilder::new(&catalog, "User")?
//!     .eq("status", "ACTIVE")?
//!     .ge("age", min_age)? // no-op
//!     .build();
//! assert_eq!(predicate.terms().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Operators validate eagerly: path resolution and literal type checking
//! happen at call time, and a failure aborts the chain through `?`.

use crate::catalog::{Catalog, EntityDef, FieldType};
use crate::error::Error;
use crate::path::{self, JoinedPath, ResolvedPath};
use filtron_model::{CompareOp, Fragment, JoinCondition, JoinKind, Predicate, TextMatch, Value};

/// A mutable accumulator of predicate fragments scoped to one entity type.
///
/// Constructed empty, mutated through a chain of operator calls, consumed
/// exactly once by [`build`](Self::build). Not shared between threads; each
/// concurrent filter construction owns its own builder.
#[derive(Debug, Clone)]
pub struct PredicateBuilder<'c> {
    catalog: &'c Catalog,
    entity: &'c EntityDef,
    fragments: Vec<Fragment>,
}

impl<'c> PredicateBuilder<'c> {
    /// Create an empty builder for the given root entity.
    pub fn new(catalog: &'c Catalog, entity: &str) -> Result<Self, Error> {
        let entity = catalog.require_entity(entity)?;
        Ok(Self {
            catalog,
            entity,
            fragments: Vec::new(),
        })
    }

    /// The root entity this builder is scoped to.
    pub fn entity(&self) -> &str {
        &self.entity.name
    }

    /// Number of fragments accumulated so far.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check whether no fragments have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Exact match. No-op when `value` is null.
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.compare(field, CompareOp::Eq, value.into())
    }

    /// Inequality. No-op when `value` is null.
    pub fn ne(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.compare(field, CompareOp::Ne, value.into())
    }

    /// Strict greater-than on an orderable field. No-op when `value` is null.
    pub fn gt(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.ordered_compare(field, CompareOp::Gt, value.into())
    }

    /// Greater-than-or-equal on an orderable field. No-op when `value` is null.
    pub fn ge(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.ordered_compare(field, CompareOp::Ge, value.into())
    }

    /// Strict less-than on an orderable field. No-op when `value` is null.
    pub fn lt(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.ordered_compare(field, CompareOp::Lt, value.into())
    }

    /// Less-than-or-equal on an orderable field. No-op when `value` is null.
    pub fn le(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.ordered_compare(field, CompareOp::Le, value.into())
    }

    /// Case-insensitive substring match on a string field. No-op when the
    /// needle is null or empty.
    pub fn like(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.text(field, TextMatch::Contains, value.into())
    }

    /// Case-insensitive prefix match on a string field. No-op when the
    /// needle is null or empty.
    pub fn starts_with(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.text(field, TextMatch::StartsWith, value.into())
    }

    /// Case-insensitive suffix match on a string field. No-op when the
    /// needle is null or empty.
    pub fn ends_with(self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.text(field, TextMatch::EndsWith, value.into())
    }

    /// Inclusive range membership. No-op unless BOTH bounds are non-null.
    pub fn between(
        self,
        field: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Self, Error> {
        self.range(field, low.into(), high.into(), None)
    }

    /// Null test. Always appended; there is no value to be absent.
    pub fn is_null(mut self, field: &str) -> Result<Self, Error> {
        path::resolve(self.catalog, &self.entity.name, field)?;
        self.fragments.push(Fragment::is_null(field));
        Ok(self)
    }

    /// Not-null test. Always appended.
    pub fn is_not_null(mut self, field: &str) -> Result<Self, Error> {
        path::resolve(self.catalog, &self.entity.name, field)?;
        self.fragments.push(Fragment::is_not_null(field));
        Ok(self)
    }

    /// Set membership. No-op when the collection is empty.
    pub fn in_values<I>(self, field: &str, values: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.membership(field, values, false)
    }

    /// Set non-membership. No-op when the collection is empty.
    pub fn not_in_values<I>(self, field: &str, values: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.membership(field, values, true)
    }

    /// Exact match resolved via an inner join on the first path segment,
    /// which must name a relation. Requests duplicate-row elimination.
    /// No-op when `value` is null.
    pub fn join_eq(mut self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_null() {
            return Ok(self);
        }
        let joined = path::resolve_join(self.catalog, &self.entity.name, field, JoinKind::Inner)?;
        self.check_joined(&joined, field, &value)?;
        self.fragments
            .push(Fragment::joined(JoinKind::Inner, field, JoinCondition::Eq(value)));
        Ok(self)
    }

    /// Case-insensitive substring match resolved via an inner join.
    /// Requests duplicate-row elimination. No-op when the needle is null or
    /// empty.
    pub fn join_like(mut self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let needle = match self.text_needle(field, value.into())? {
            Some(needle) => needle,
            None => return Ok(self),
        };
        let joined = path::resolve_join(self.catalog, &self.entity.name, field, JoinKind::Inner)?;
        self.check_joined_text(&joined, field)?;
        self.fragments.push(Fragment::joined(
            JoinKind::Inner,
            field,
            JoinCondition::Like(needle),
        ));
        Ok(self)
    }

    /// Set membership resolved via an inner join. Requests duplicate-row
    /// elimination. No-op when the collection is empty.
    pub fn join_in<I>(mut self, field: &str, values: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(self);
        }
        let joined = path::resolve_join(self.catalog, &self.entity.name, field, JoinKind::Inner)?;
        for value in &values {
            self.check_joined(&joined, field, value)?;
        }
        self.fragments.push(Fragment::joined(
            JoinKind::Inner,
            field,
            JoinCondition::In(values),
        ));
        Ok(self)
    }

    /// Exact match resolved via a left join: rows survive whether or not a
    /// related record exists, with null substituted when none does.
    /// Requests duplicate-row elimination. No-op when `value` is null.
    pub fn left_join_eq(mut self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_null() {
            return Ok(self);
        }
        let joined = path::resolve_join(self.catalog, &self.entity.name, field, JoinKind::Left)?;
        self.check_joined(&joined, field, &value)?;
        self.fragments
            .push(Fragment::joined(JoinKind::Left, field, JoinCondition::Eq(value)));
        Ok(self)
    }

    /// Exact match on a date-valued field. No-op when `value` is null.
    pub fn date_eq(mut self, field: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let value = value.into();
        if value.is_null() {
            return Ok(self);
        }
        let field_type = self.terminal_field(field)?;
        if field_type.scalar() != crate::catalog::ScalarType::Date {
            return Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: "date".to_string(),
                actual: value.kind(),
            });
        }
        self.check_literal(field, field_type, &value)?;
        self.fragments.push(Fragment::Compare {
            path: field.to_string(),
            op: CompareOp::Eq,
            value,
        });
        Ok(self)
    }

    /// Inclusive range on a date-valued field. No-op unless BOTH bounds are
    /// non-null.
    pub fn date_between(
        self,
        field: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Result<Self, Error> {
        self.range(field, start.into(), end.into(), Some(false))
    }

    /// Inclusive range on a datetime-valued field. No-op unless BOTH bounds
    /// are non-null.
    pub fn datetime_between(
        self,
        field: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Result<Self, Error> {
        self.range(field, start.into(), end.into(), Some(true))
    }

    /// Merge the last fragment with the given fragment via OR.
    ///
    /// This binds to the single most recently added fragment only, not to
    /// the whole accumulated conjunction: `a.eq(..)?.eq(..)?.or(x)` builds
    /// `first AND (second OR x)`. On an empty builder a present fragment
    /// becomes the sole first fragment; an absent one is a no-op.
    pub fn or(mut self, fragment: impl Into<Option<Fragment>>) -> Self {
        let fragment = fragment.into();
        if let Some(last) = self.fragments.pop() {
            match fragment {
                Some(fragment) => self.fragments.push(last.or(fragment)),
                None => self.fragments.push(last),
            }
        } else if let Some(fragment) = fragment {
            self.fragments.push(fragment);
        }
        self
    }

    /// Append an externally constructed fragment verbatim. Absent fragment
    /// is a no-op.
    pub fn custom(mut self, fragment: impl Into<Option<Fragment>>) -> Self {
        if let Some(fragment) = fragment.into() {
            self.fragments.push(fragment);
        }
        self
    }

    /// Consume the builder and fold the fragment sequence into one
    /// predicate with logical AND, fragment 0 first. An empty builder
    /// yields the predicate that matches everything.
    pub fn build(self) -> Predicate {
        Predicate::new(self.fragments)
    }

    // ---- internal helpers ----

    /// Resolve a path and require it to end on a field, returning that type.
    fn terminal_field(&self, field: &str) -> Result<FieldType, Error> {
        let resolved: ResolvedPath = path::resolve(self.catalog, &self.entity.name, field)?;
        resolved.terminal_type().ok_or_else(|| Error::TypeMismatch {
            path: field.to_string(),
            expected: "a scalar field, not a relation".to_string(),
            actual: filtron_model::ValueKind::Null,
        })
    }

    fn check_literal(&self, field: &str, field_type: FieldType, value: &Value) -> Result<(), Error> {
        if field_type.scalar().accepts(value.kind()) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: field_type.to_string(),
                actual: value.kind(),
            })
        }
    }

    fn compare(mut self, field: &str, op: CompareOp, value: Value) -> Result<Self, Error> {
        if value.is_null() {
            return Ok(self);
        }
        let field_type = self.terminal_field(field)?;
        self.check_literal(field, field_type, &value)?;
        self.fragments.push(Fragment::Compare {
            path: field.to_string(),
            op,
            value,
        });
        Ok(self)
    }

    fn ordered_compare(self, field: &str, op: CompareOp, value: Value) -> Result<Self, Error> {
        if value.is_null() {
            return Ok(self);
        }
        let field_type = self.terminal_field(field)?;
        if !field_type.scalar().is_orderable() {
            return Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: format!("an orderable type, not {field_type}"),
                actual: value.kind(),
            });
        }
        self.compare(field, op, value)
    }

    /// Extract and validate a text-operator needle; `None` means no-op.
    fn text_needle(&self, field: &str, value: Value) -> Result<Option<String>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: "string".to_string(),
                actual: other.kind(),
            }),
        }
    }

    fn text(mut self, field: &str, matcher: TextMatch, value: Value) -> Result<Self, Error> {
        let needle = match self.text_needle(field, value)? {
            Some(needle) => needle,
            None => return Ok(self),
        };
        let field_type = self.terminal_field(field)?;
        self.check_literal(field, field_type, &Value::String(needle.clone()))?;
        self.fragments.push(Fragment::Text {
            path: field.to_string(),
            matcher,
            needle,
        });
        Ok(self)
    }

    /// Shared between/date_between/datetime_between implementation.
    /// `temporal`: `None` for the generic range, `Some(false)` to require a
    /// Date field, `Some(true)` to require a DateTime field.
    fn range(
        mut self,
        field: &str,
        low: Value,
        high: Value,
        temporal: Option<bool>,
    ) -> Result<Self, Error> {
        if low.is_null() || high.is_null() {
            return Ok(self);
        }
        let field_type = self.terminal_field(field)?;
        if let Some(want_datetime) = temporal {
            let scalar = field_type.scalar();
            let ok = if want_datetime {
                scalar == crate::catalog::ScalarType::DateTime
            } else {
                scalar == crate::catalog::ScalarType::Date
            };
            if !ok {
                return Err(Error::TypeMismatch {
                    path: field.to_string(),
                    expected: if want_datetime { "datetime" } else { "date" }.to_string(),
                    actual: low.kind(),
                });
            }
        } else if !field_type.scalar().is_orderable() {
            return Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: format!("an orderable type, not {field_type}"),
                actual: low.kind(),
            });
        }
        self.check_literal(field, field_type, &low)?;
        self.check_literal(field, field_type, &high)?;
        self.fragments.push(Fragment::Between {
            path: field.to_string(),
            low,
            high,
        });
        Ok(self)
    }

    fn membership<I>(mut self, field: &str, values: I, negated: bool) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(self);
        }
        let field_type = self.terminal_field(field)?;
        for value in &values {
            self.check_literal(field, field_type, value)?;
        }
        self.fragments.push(Fragment::InSet {
            path: field.to_string(),
            values,
            negated,
        });
        Ok(self)
    }

    /// Type-check a join condition literal against the joined terminal
    /// field, or against the target entity's identity field when the path
    /// is the bare relation name.
    fn check_joined(&self, joined: &JoinedPath, field: &str, value: &Value) -> Result<(), Error> {
        let field_type = self.joined_terminal(joined, field)?;
        self.check_literal(field, field_type, value)
    }

    fn check_joined_text(&self, joined: &JoinedPath, field: &str) -> Result<(), Error> {
        let field_type = self.joined_terminal(joined, field)?;
        if field_type.scalar() == crate::catalog::ScalarType::String {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                path: field.to_string(),
                expected: field_type.to_string(),
                actual: filtron_model::ValueKind::String,
            })
        }
    }

    fn joined_terminal(&self, joined: &JoinedPath, field: &str) -> Result<FieldType, Error> {
        if joined.rest.steps.is_empty() {
            // Bare relation path: the condition applies to the target
            // entity's identity field.
            let target = self.catalog.require_entity(&joined.relation.to_entity)?;
            let identity = target.get_identity_field().ok_or_else(|| Error::UnknownField {
                entity: target.name.clone(),
                field: target.identity_field.clone(),
            })?;
            Ok(identity.field_type)
        } else {
            joined.rest.terminal_type().ok_or_else(|| Error::TypeMismatch {
                path: field.to_string(),
                expected: "a scalar field, not a relation".to_string(),
                actual: filtron_model::ValueKind::Null,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EntityDef, RelationDef, ScalarType};
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_entity(
                EntityDef::new("User", "id")
                    .with_scalar("id", ScalarType::Uuid)
                    .with_scalar("name", ScalarType::String)
                    .with_scalar("status", ScalarType::String)
                    .with_scalar("age", ScalarType::Int32)
                    .with_scalar("created_on", ScalarType::Date)
                    .with_optional("deleted_at", ScalarType::DateTime),
            )
            .with_entity(
                EntityDef::new("Role", "id")
                    .with_scalar("id", ScalarType::Uuid)
                    .with_scalar("name", ScalarType::String),
            )
            .with_relation(RelationDef::many_to_many(
                "roles", "User", "user_id", "Role", "role_id", "UserRole",
            ))
    }

    fn builder(catalog: &Catalog) -> PredicateBuilder<'_> {
        PredicateBuilder::new(catalog, "User").unwrap()
    }

    #[test]
    fn test_unknown_entity() {
        let catalog = catalog();
        assert!(matches!(
            PredicateBuilder::new(&catalog, "Nope"),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_absent_values_are_noops() {
        let catalog = catalog();
        let b = builder(&catalog)
            .eq("status", None::<&str>)
            .unwrap()
            .ne("status", None::<&str>)
            .unwrap()
            .like("name", None::<&str>)
            .unwrap()
            .like("name", "")
            .unwrap()
            .gt("age", None::<i32>)
            .unwrap()
            .between("age", None::<i32>, 65)
            .unwrap()
            .between("age", 18, None::<i32>)
            .unwrap()
            .in_values("status", Vec::<&str>::new())
            .unwrap()
            .join_in("roles.name", Vec::<&str>::new())
            .unwrap()
            .date_eq("created_on", None::<NaiveDate>)
            .unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_each_call_appends_exactly_one_fragment() {
        let catalog = catalog();
        let b = builder(&catalog)
            .eq("status", "ACTIVE")
            .unwrap()
            .gt("age", 18)
            .unwrap()
            .like("name", "jo")
            .unwrap()
            .between("age", 18, 65)
            .unwrap()
            .is_null("deleted_at")
            .unwrap()
            .in_values("status", ["ACTIVE", "PENDING"])
            .unwrap();
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn test_null_checks_always_append() {
        let catalog = catalog();
        let b = builder(&catalog)
            .is_null("deleted_at")
            .unwrap()
            .is_not_null("deleted_at")
            .unwrap();
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_empty_build_is_unrestricted() {
        let catalog = catalog();
        assert!(builder(&catalog).build().is_unrestricted());
    }

    #[test]
    fn test_or_binds_to_last_fragment_only() {
        let catalog = catalog();
        let predicate = builder(&catalog)
            .gt("age", 18)
            .unwrap()
            .eq("status", "ACTIVE")
            .unwrap()
            .or(Fragment::eq("status", "PENDING"))
            .build();

        // first AND (second OR x), not (first AND second) OR x
        assert_eq!(predicate.terms().len(), 2);
        assert_eq!(predicate.terms()[0], Fragment::gt("age", 18));
        assert_eq!(
            predicate.terms()[1],
            Fragment::eq("status", "ACTIVE").or(Fragment::eq("status", "PENDING"))
        );
    }

    #[test]
    fn test_or_on_empty_builder() {
        let catalog = catalog();
        let predicate = builder(&catalog)
            .or(Fragment::eq("status", "PENDING"))
            .build();
        assert_eq!(predicate.terms(), [Fragment::eq("status", "PENDING")]);

        let predicate = builder(&catalog).or(None).build();
        assert!(predicate.is_unrestricted());
    }

    #[test]
    fn test_custom_appends_verbatim() {
        let catalog = catalog();
        let fragment = Fragment::is_not_null("name").or(Fragment::eq("age", 0));
        let predicate = builder(&catalog).custom(fragment.clone()).custom(None).build();
        assert_eq!(predicate.terms(), [fragment]);
    }

    #[test]
    fn test_path_resolution_error_aborts_chain() {
        let catalog = catalog();
        let err = builder(&catalog).eq("nickname", "jo").unwrap_err();
        assert!(matches!(err, Error::PathResolution { segment, .. } if segment == "nickname"));
    }

    #[test]
    fn test_type_mismatch() {
        let catalog = catalog();
        let err = builder(&catalog).gt("name", 5).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let err = builder(&catalog).like("age", "jo").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_date_operators_check_granularity() {
        let catalog = catalog();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let b = builder(&catalog).date_eq("created_on", date).unwrap();
        assert_eq!(b.len(), 1);

        // Date literal against a datetime field is rejected
        let err = builder(&catalog)
            .date_between("deleted_at", date, date)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = date.and_hms_opt(23, 59, 59).unwrap();
        let b = builder(&catalog)
            .datetime_between("deleted_at", start, end)
            .unwrap();
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_join_requires_relation_first_segment() {
        let catalog = catalog();
        let err = builder(&catalog).join_eq("name.x", "jo").unwrap_err();
        assert!(matches!(err, Error::NotARelation { segment, .. } if segment == "name"));
    }

    #[test]
    fn test_join_operators_build_joined_fragments() {
        let catalog = catalog();
        let predicate = builder(&catalog)
            .join_eq("roles.name", "ADMIN")
            .unwrap()
            .join_like("roles.name", "adm")
            .unwrap()
            .join_in("roles.name", ["ADMIN", "USER"])
            .unwrap()
            .left_join_eq("roles.name", "GUEST")
            .unwrap()
            .build();
        assert_eq!(predicate.terms().len(), 4);
        assert!(predicate.requests_distinct());
        assert!(predicate
            .terms()
            .iter()
            .all(|f| matches!(f, Fragment::Joined { .. })));
    }
}
