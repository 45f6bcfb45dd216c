//! Predicate fragment IR.
//!
//! A [`Fragment`] is one immutable boolean condition over an entity graph,
//! produced by exactly one builder operator call (or constructed directly
//! for `custom` fragments). Fields are referenced by dot-separated paths
//! (e.g. `"address.city.name"`); resolution against a schema happens in
//! `filtron-core`.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Comparison operator for [`Fragment::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

/// Case-insensitive text match kind for [`Fragment::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMatch {
    /// Substring match (`%needle%`).
    Contains,
    /// Prefix match (`needle%`).
    StartsWith,
    /// Suffix match (`%needle`).
    EndsWith,
}

/// Relationship traversal kind for [`Fragment::Joined`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    /// Only rows with at least one matching related record survive.
    Inner,
    /// Rows survive whether or not a related record exists; null is
    /// substituted when none does.
    Left,
}

/// Condition applied to the join-resolved path of a [`Fragment::Joined`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinCondition {
    /// Exact match.
    Eq(Value),
    /// Case-insensitive substring match.
    Like(String),
    /// Set membership.
    In(Vec<Value>),
}

/// One boolean condition over an entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    /// Ordering or (in)equality comparison of a field against a literal.
    Compare {
        /// Dot-separated field path.
        path: String,
        /// Comparison operator.
        op: CompareOp,
        /// Literal to compare against.
        value: Value,
    },
    /// Case-insensitive text match on a string field.
    Text {
        /// Dot-separated field path.
        path: String,
        /// Match kind.
        matcher: TextMatch,
        /// Needle, matched case-insensitively.
        needle: String,
    },
    /// Inclusive range membership (both bounds included).
    Between {
        /// Dot-separated field path.
        path: String,
        /// Lower bound, inclusive.
        low: Value,
        /// Upper bound, inclusive.
        high: Value,
    },
    /// Null test.
    Null {
        /// Dot-separated field path.
        path: String,
        /// When true, tests for NOT NULL.
        negated: bool,
    },
    /// Set membership against a collection of literals.
    InSet {
        /// Dot-separated field path.
        path: String,
        /// Member literals.
        values: Vec<Value>,
        /// When true, tests for non-membership.
        negated: bool,
    },
    /// Condition resolved through an explicit relationship join. Evaluating
    /// one of these requests duplicate-row elimination on the query context.
    Joined {
        /// Join kind for the first path segment (which must name a relation).
        kind: JoinKind,
        /// Dot-separated path; the first segment is the relation to join.
        path: String,
        /// Condition on the join-resolved path.
        condition: JoinCondition,
    },
    /// Disjunction of exactly two fragments.
    Or(Box<Fragment>, Box<Fragment>),
}

impl Fragment {
    /// Create an equality fragment.
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    /// Create an inequality fragment.
    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Ne,
            value: value.into(),
        }
    }

    /// Create a greater-than fragment.
    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Gt,
            value: value.into(),
        }
    }

    /// Create a greater-than-or-equal fragment.
    pub fn ge(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Ge,
            value: value.into(),
        }
    }

    /// Create a less-than fragment.
    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Lt,
            value: value.into(),
        }
    }

    /// Create a less-than-or-equal fragment.
    pub fn le(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Compare {
            path: path.into(),
            op: CompareOp::Le,
            value: value.into(),
        }
    }

    /// Create a case-insensitive substring-match fragment.
    pub fn like(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Fragment::Text {
            path: path.into(),
            matcher: TextMatch::Contains,
            needle: needle.into(),
        }
    }

    /// Create a case-insensitive prefix-match fragment.
    pub fn starts_with(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Fragment::Text {
            path: path.into(),
            matcher: TextMatch::StartsWith,
            needle: needle.into(),
        }
    }

    /// Create a case-insensitive suffix-match fragment.
    pub fn ends_with(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Fragment::Text {
            path: path.into(),
            matcher: TextMatch::EndsWith,
            needle: needle.into(),
        }
    }

    /// Create an inclusive range fragment.
    pub fn between(
        path: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Fragment::Between {
            path: path.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Create an IS NULL fragment.
    pub fn is_null(path: impl Into<String>) -> Self {
        Fragment::Null {
            path: path.into(),
            negated: false,
        }
    }

    /// Create an IS NOT NULL fragment.
    pub fn is_not_null(path: impl Into<String>) -> Self {
        Fragment::Null {
            path: path.into(),
            negated: true,
        }
    }

    /// Create a set-membership fragment.
    pub fn in_values(path: impl Into<String>, values: Vec<Value>) -> Self {
        Fragment::InSet {
            path: path.into(),
            values,
            negated: false,
        }
    }

    /// Create a set-non-membership fragment.
    pub fn not_in_values(path: impl Into<String>, values: Vec<Value>) -> Self {
        Fragment::InSet {
            path: path.into(),
            values,
            negated: true,
        }
    }

    /// Create a join-resolved fragment.
    pub fn joined(kind: JoinKind, path: impl Into<String>, condition: JoinCondition) -> Self {
        Fragment::Joined {
            kind,
            path: path.into(),
            condition,
        }
    }

    /// Combine this fragment with another via OR.
    pub fn or(self, other: Fragment) -> Self {
        Fragment::Or(Box::new(self), Box::new(other))
    }

    /// Check whether this fragment traverses a relationship join (and will
    /// therefore request duplicate elimination when evaluated).
    pub fn requests_distinct(&self) -> bool {
        match self {
            Fragment::Joined { .. } => true,
            Fragment::Or(a, b) => a.requests_distinct() || b.requests_distinct(),
            _ => false,
        }
    }
}
