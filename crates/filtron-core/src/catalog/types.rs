//! Core type definitions for the catalog.

use filtron_model::ValueKind;
use serde::{Deserialize, Serialize};

/// Scalar data types supported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Calendar date without time-of-day.
    Date,
    /// Date and time without timezone.
    DateTime,
    /// UUID (128-bit identifier).
    Uuid,
}

/// Field types - a scalar, nullable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A scalar value.
    Scalar(ScalarType),
    /// An optional scalar value (nullable).
    Optional(ScalarType),
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32 | ScalarType::Int64 | ScalarType::Float64
        )
    }

    /// Check if this type is a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ScalarType::Date | ScalarType::DateTime)
    }

    /// Check if this type supports total ordering (comparison operators).
    pub fn is_orderable(&self) -> bool {
        self.is_numeric() || self.is_temporal() || matches!(self, ScalarType::String)
    }

    /// Check whether a literal of the given kind can be compared against
    /// this type. Int32/Int64 literals are mutually accepted for either
    /// integer field type.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            ScalarType::Bool => kind == ValueKind::Bool,
            ScalarType::Int32 | ScalarType::Int64 => {
                matches!(kind, ValueKind::Int32 | ValueKind::Int64)
            }
            ScalarType::Float64 => kind == ValueKind::Float64,
            ScalarType::String => kind == ValueKind::String,
            ScalarType::Date => kind == ValueKind::Date,
            ScalarType::DateTime => kind == ValueKind::DateTime,
            ScalarType::Uuid => kind == ValueKind::Uuid,
        }
    }
}

impl FieldType {
    /// The underlying scalar type.
    pub fn scalar(&self) -> ScalarType {
        match self {
            FieldType::Scalar(s) | FieldType::Optional(s) => *s,
        }
    }

    /// Check if this field is nullable.
    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
            ScalarType::Date => "date",
            ScalarType::DateTime => "datetime",
            ScalarType::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Scalar(s) => write!(f, "{s}"),
            FieldType::Optional(s) => write!(f, "optional {s}"),
        }
    }
}
