//! Fragment evaluation against entity rows.

use std::cmp::Ordering;

use filtron_model::{CompareOp, Fragment, JoinCondition, JoinKind, TextMatch, Value};

use crate::catalog::{Cardinality, Catalog, RelationDef};
use crate::engine::context::QueryContext;
use crate::engine::store::{EntityRow, MemoryStore};
use crate::error::Error;
use crate::path::{self, StepKind};

/// Outcome of evaluating one fragment against one root row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentMatch {
    /// Whether the row satisfies the fragment.
    pub matched: bool,
    /// Number of joined copies of the row that satisfy the fragment.
    /// 1 for fragments that do not traverse a join.
    pub multiplicity: usize,
}

impl FragmentMatch {
    fn miss() -> Self {
        Self {
            matched: false,
            multiplicity: 1,
        }
    }

    fn hit(multiplicity: usize) -> Self {
        Self {
            matched: true,
            multiplicity,
        }
    }
}

/// Evaluates predicate fragments against rows of a [`MemoryStore`].
pub struct FragmentEvaluator<'a> {
    catalog: &'a Catalog,
    store: &'a MemoryStore,
}

impl<'a> FragmentEvaluator<'a> {
    /// Create an evaluator over a store and its catalog.
    pub fn new(catalog: &'a Catalog, store: &'a MemoryStore) -> Self {
        Self { catalog, store }
    }

    /// Evaluate a fragment against a row of the given entity.
    ///
    /// Join-resolved fragments request duplicate elimination on the context
    /// as a side effect, whether or not the row matches.
    pub fn evaluate(
        &self,
        entity: &str,
        row: &EntityRow,
        fragment: &Fragment,
        ctx: &mut QueryContext,
    ) -> Result<FragmentMatch, Error> {
        match fragment {
            Fragment::Compare { path, op, value } => {
                let reachable = self.reachable_values(entity, row, path)?;
                let matched = reachable.iter().any(|v| Self::apply_op(*op, v, value));
                Ok(if matched {
                    FragmentMatch::hit(1)
                } else {
                    FragmentMatch::miss()
                })
            }
            Fragment::Text {
                path,
                matcher,
                needle,
            } => {
                let reachable = self.reachable_values(entity, row, path)?;
                let matched = reachable
                    .iter()
                    .any(|v| Self::text_match(v, *matcher, needle));
                Ok(if matched {
                    FragmentMatch::hit(1)
                } else {
                    FragmentMatch::miss()
                })
            }
            Fragment::Between { path, low, high } => {
                let reachable = self.reachable_values(entity, row, path)?;
                let matched = reachable.iter().any(|v| {
                    Self::compare_values(v, low).map(Ordering::is_ge).unwrap_or(false)
                        && Self::compare_values(v, high).map(Ordering::is_le).unwrap_or(false)
                });
                Ok(if matched {
                    FragmentMatch::hit(1)
                } else {
                    FragmentMatch::miss()
                })
            }
            Fragment::Null { path, negated } => {
                let reachable = self.reachable_values(entity, row, path)?;
                let matched = if *negated {
                    reachable.iter().any(|v| !v.is_null())
                } else {
                    reachable.is_empty() || reachable.iter().any(Value::is_null)
                };
                Ok(if matched {
                    FragmentMatch::hit(1)
                } else {
                    FragmentMatch::miss()
                })
            }
            Fragment::InSet {
                path,
                values,
                negated,
            } => {
                let reachable = self.reachable_values(entity, row, path)?;
                let contains =
                    |v: &Value| values.iter().any(|member| Self::values_equal(v, member));
                let matched = if *negated {
                    // NOT IN under three-valued logic: null is neither in
                    // nor outside any set.
                    reachable.iter().any(|v| !v.is_null() && !contains(v))
                } else {
                    reachable.iter().any(|v| contains(v))
                };
                Ok(if matched {
                    FragmentMatch::hit(1)
                } else {
                    FragmentMatch::miss()
                })
            }
            Fragment::Joined {
                kind,
                path,
                condition,
            } => self.evaluate_joined(entity, row, *kind, path, condition, ctx),
            Fragment::Or(a, b) => {
                let left = self.evaluate(entity, row, a, ctx)?;
                let right = self.evaluate(entity, row, b, ctx)?;
                Ok(FragmentMatch {
                    matched: left.matched || right.matched,
                    multiplicity: left.multiplicity.max(right.multiplicity),
                })
            }
        }
    }

    fn evaluate_joined(
        &self,
        entity: &str,
        row: &EntityRow,
        kind: JoinKind,
        raw_path: &str,
        condition: &JoinCondition,
        ctx: &mut QueryContext,
    ) -> Result<FragmentMatch, Error> {
        // Any join traversal may fan out duplicate root rows; signal
        // elimination regardless of the outcome for this row.
        ctx.request_distinct();

        let joined = path::resolve_join(self.catalog, entity, raw_path, kind)?;
        let related = self.related_rows(&joined.relation, row)?;

        if related.is_empty() {
            return Ok(match kind {
                // Inner join: rows without a related record do not survive.
                JoinKind::Inner => FragmentMatch::miss(),
                // Left join: null is substituted for the missing record.
                JoinKind::Left => {
                    if Self::condition_matches(condition, &[Value::Null]) {
                        FragmentMatch::hit(1)
                    } else {
                        FragmentMatch::miss()
                    }
                }
            });
        }

        let mut satisfying = 0usize;
        for related_row in &related {
            let values = if joined.rest.steps.is_empty() {
                let target = self.catalog.require_entity(&joined.relation.to_entity)?;
                vec![related_row
                    .get(&target.identity_field)
                    .cloned()
                    .unwrap_or(Value::Null)]
            } else {
                self.reachable_values(&joined.relation.to_entity, related_row, &joined.rest.raw)?
            };
            if Self::condition_matches(condition, &values) {
                satisfying += 1;
            }
        }

        Ok(if satisfying > 0 {
            FragmentMatch::hit(satisfying)
        } else {
            FragmentMatch::miss()
        })
    }

    /// Collect every terminal value reachable by walking a field path from
    /// a row. To-one relations contribute at most one row to the walk,
    /// to-many relations contribute all related rows; a row missing the
    /// terminal field contributes `Null`.
    fn reachable_values(
        &self,
        entity: &str,
        row: &EntityRow,
        raw_path: &str,
    ) -> Result<Vec<Value>, Error> {
        let resolved = path::resolve(self.catalog, entity, raw_path)?;
        let mut current: Vec<&EntityRow> = vec![row];

        for step in &resolved.steps {
            match &step.kind {
                StepKind::Attribute(_) => {
                    return Ok(current
                        .iter()
                        .map(|r| r.get(&step.name).cloned().unwrap_or(Value::Null))
                        .collect());
                }
                StepKind::Relation(relation) => {
                    let mut next = Vec::new();
                    for r in &current {
                        next.extend(self.related_rows(relation, r)?);
                    }
                    current = next;
                }
            }
        }

        // Path ends on a relation; no terminal field values.
        Ok(Vec::new())
    }

    /// All rows related to `row` through a relation.
    fn related_rows(
        &self,
        relation: &RelationDef,
        row: &EntityRow,
    ) -> Result<Vec<&'a EntityRow>, Error> {
        let targets = self.store.rows(&relation.to_entity);

        match relation.cardinality {
            Cardinality::OneToOne | Cardinality::OneToMany => {
                let anchor = match row.get(&relation.from_field) {
                    Some(v) if !v.is_null() => v,
                    _ => return Ok(Vec::new()),
                };
                Ok(targets
                    .iter()
                    .filter(|t| {
                        t.get(&relation.to_field)
                            .map(|v| Self::values_equal(v, anchor))
                            .unwrap_or(false)
                    })
                    .collect())
            }
            Cardinality::ManyToMany => {
                let Some(edge_entity) = relation.edge_entity.as_deref() else {
                    return Ok(Vec::new());
                };
                let source = self.catalog.require_entity(&relation.from_entity)?;
                let target = self.catalog.require_entity(&relation.to_entity)?;
                let source_id = match row.get(&source.identity_field) {
                    Some(v) if !v.is_null() => v,
                    _ => return Ok(Vec::new()),
                };

                let mut related = Vec::new();
                for edge in self.store.rows(edge_entity) {
                    let edge_matches = edge
                        .get(&relation.from_field)
                        .map(|v| Self::values_equal(v, source_id))
                        .unwrap_or(false);
                    if !edge_matches {
                        continue;
                    }
                    let Some(target_id) = edge.get(&relation.to_field) else {
                        continue;
                    };
                    related.extend(targets.iter().filter(|t| {
                        t.get(&target.identity_field)
                            .map(|v| Self::values_equal(v, target_id))
                            .unwrap_or(false)
                    }));
                }
                Ok(related)
            }
        }
    }

    fn condition_matches(condition: &JoinCondition, values: &[Value]) -> bool {
        match condition {
            JoinCondition::Eq(expected) => {
                values.iter().any(|v| Self::values_equal(v, expected))
            }
            JoinCondition::Like(needle) => values
                .iter()
                .any(|v| Self::text_match(v, TextMatch::Contains, needle)),
            JoinCondition::In(members) => values
                .iter()
                .any(|v| members.iter().any(|member| Self::values_equal(v, member))),
        }
    }

    fn apply_op(op: CompareOp, field_value: &Value, literal: &Value) -> bool {
        match op {
            CompareOp::Eq => Self::values_equal(field_value, literal),
            // `<>` under three-valued logic: null compares as unknown.
            CompareOp::Ne => {
                !field_value.is_null() && !Self::values_equal(field_value, literal)
            }
            CompareOp::Lt => Self::compare_values(field_value, literal)
                .map(Ordering::is_lt)
                .unwrap_or(false),
            CompareOp::Le => Self::compare_values(field_value, literal)
                .map(Ordering::is_le)
                .unwrap_or(false),
            CompareOp::Gt => Self::compare_values(field_value, literal)
                .map(Ordering::is_gt)
                .unwrap_or(false),
            CompareOp::Ge => Self::compare_values(field_value, literal)
                .map(Ordering::is_ge)
                .unwrap_or(false),
        }
    }

    /// Value equality with integer-width widening.
    pub fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int32(_) | Value::Int64(_), Value::Int32(_) | Value::Int64(_)) => {
                a.as_i64() == b.as_i64()
            }
            _ => a == b,
        }
    }

    /// Ordering between two values of comparable kinds; `None` when the
    /// kinds do not order against each other (including any null).
    pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Int32(_) | Value::Int64(_), Value::Int32(_) | Value::Int64(_)) => {
                Some(a.as_i64()?.cmp(&b.as_i64()?))
            }
            (Value::Float64(x), Value::Float64(y)) => x.partial_cmp(y),
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
            (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    fn text_match(value: &Value, matcher: TextMatch, needle: &str) -> bool {
        let Some(haystack) = value.as_str() else {
            return false;
        };
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        match matcher {
            TextMatch::Contains => haystack.contains(&needle),
            TextMatch::StartsWith => haystack.starts_with(&needle),
            TextMatch::EndsWith => haystack.ends_with(&needle),
        }
    }
}
