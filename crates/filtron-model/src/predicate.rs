//! Composed predicates.

use crate::fragment::Fragment;
use serde::{Deserialize, Serialize};

/// The fully composed boolean condition handed to a query engine.
///
/// A predicate is the conjunction of its terms, fragment 0 first. An empty
/// term list is the neutral element of conjunction: it matches every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    terms: Vec<Fragment>,
}

impl Predicate {
    /// Create a predicate from an ordered fragment sequence.
    pub fn new(terms: Vec<Fragment>) -> Self {
        Self { terms }
    }

    /// Create the predicate that matches every record.
    pub fn matches_all() -> Self {
        Self { terms: Vec::new() }
    }

    /// Check whether this predicate matches every record (no terms).
    pub fn is_unrestricted(&self) -> bool {
        self.terms.is_empty()
    }

    /// The conjunction terms, in append order.
    pub fn terms(&self) -> &[Fragment] {
        &self.terms
    }

    /// Check whether any term traverses a relationship join.
    pub fn requests_distinct(&self) -> bool {
        self.terms.iter().any(Fragment::requests_distinct)
    }
}

impl From<Fragment> for Predicate {
    fn from(fragment: Fragment) -> Self {
        Self {
            terms: vec![fragment],
        }
    }
}
