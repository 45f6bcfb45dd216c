//! Query execution against an in-memory store.

use std::cmp::Ordering;

use filtron_model::{Page, PageRequest, Predicate, SortDirection, Value};
use tracing::debug;

use crate::catalog::Catalog;
use crate::engine::context::QueryContext;
use crate::engine::eval::FragmentEvaluator;
use crate::engine::store::{EntityRow, MemoryStore};
use crate::error::Error;

/// Evaluates composed predicates against a [`MemoryStore`] and materializes
/// matching rows.
///
/// Honors the duplicate-elimination request raised by join-resolved
/// fragments: when set, each matching root row is returned once; otherwise
/// a row fanned out by join traversal is returned once per joined copy.
pub struct QueryEngine<'a> {
    catalog: &'a Catalog,
    store: &'a MemoryStore,
}

impl<'a> QueryEngine<'a> {
    /// Create an engine over a store and its catalog.
    pub fn new(catalog: &'a Catalog, store: &'a MemoryStore) -> Self {
        Self { catalog, store }
    }

    /// All rows of an entity matching a predicate.
    pub fn find_all(&self, entity: &str, predicate: &Predicate) -> Result<Vec<EntityRow>, Error> {
        self.catalog.require_entity(entity)?;
        let evaluator = FragmentEvaluator::new(self.catalog, self.store);
        let mut ctx = QueryContext::new();

        let mut matches: Vec<(&EntityRow, usize)> = Vec::new();
        for row in self.store.rows(entity) {
            let mut multiplicity = 1usize;
            let mut matched = true;
            for fragment in predicate.terms() {
                let m = evaluator.evaluate(entity, row, fragment, &mut ctx)?;
                if !m.matched {
                    matched = false;
                    break;
                }
                multiplicity *= m.multiplicity;
            }
            if matched {
                matches.push((row, multiplicity));
            }
        }

        // The distinct flag is read exactly once, here, at materialization.
        let distinct = ctx.is_distinct();
        debug!(
            entity,
            terms = predicate.terms().len(),
            matched = matches.len(),
            distinct,
            "executed predicate"
        );

        let mut results = Vec::new();
        for (row, multiplicity) in matches {
            let copies = if distinct { 1 } else { multiplicity };
            for _ in 0..copies {
                results.push(row.clone());
            }
        }
        Ok(results)
    }

    /// One page of matching rows, sorted and windowed per the request.
    pub fn find_page(
        &self,
        entity: &str,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> Result<Page<EntityRow>, Error> {
        let mut rows = self.find_all(entity, predicate)?;
        self.sort_rows(entity, &mut rows, request)?;

        let total = rows.len();
        let items: Vec<EntityRow> = rows
            .into_iter()
            .skip(request.offset())
            .take(request.size as usize)
            .collect();
        Ok(Page::new(items, request.page, request.size, total))
    }

    /// Number of rows matching a predicate.
    pub fn count(&self, entity: &str, predicate: &Predicate) -> Result<usize, Error> {
        Ok(self.find_all(entity, predicate)?.len())
    }

    /// Whether any row matches a predicate.
    pub fn exists(&self, entity: &str, predicate: &Predicate) -> Result<bool, Error> {
        Ok(!self.find_all(entity, predicate)?.is_empty())
    }

    fn sort_rows(
        &self,
        entity: &str,
        rows: &mut [EntityRow],
        request: &PageRequest,
    ) -> Result<(), Error> {
        if request.sort.is_empty() {
            return Ok(());
        }
        let def = self.catalog.require_entity(entity)?;
        for spec in &request.sort {
            if def.get_field(&spec.field).is_none() {
                return Err(Error::UnknownField {
                    entity: entity.to_string(),
                    field: spec.field.clone(),
                });
            }
        }

        rows.sort_by(|a, b| {
            for spec in &request.sort {
                let av = a.get(&spec.field).unwrap_or(&Value::Null);
                let bv = b.get(&spec.field).unwrap_or(&Value::Null);
                let ord = FragmentEvaluator::compare_values(av, bv).unwrap_or(Ordering::Equal);
                let ord = match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }
}
