//! Field metadata error types
//!
//! Encode errors fall into three classes:
//! - Validation: the descriptor breaks a rule; detected before any write
//! - Backend: an attribute write failed; earlier writes of the same call stay
//! - NotImplemented: reserved operations (basis, quadrature)

use std::fmt;

use thiserror::Error;

use crate::attribute::StoreError;

use super::key::AttributeSuffix;
use super::types::{EntityType, FieldType};

/// Result type for encode operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Broad classification of an `EncodeError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeErrorKind {
    Validation,
    Backend,
    NotImplemented,
}

impl fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeErrorKind::Validation => write!(f, "VALIDATION"),
            EncodeErrorKind::Backend => write!(f, "BACKEND"),
            EncodeErrorKind::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
        }
    }
}

/// Field metadata encode errors
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Field '{field}' nesting is {nesting}, it must be 1 for a user-defined field type")]
    InvalidNesting { field: String, nesting: usize },

    #[error("Field '{field}' is of type {actual}, not user_defined; cannot specify suffices")]
    WrongFieldType { field: String, actual: FieldType },

    #[error("Field '{field}' cardinality is {expected} but there were {actual} suffices defined")]
    CardinalityMismatch {
        field: String,
        expected: i64,
        actual: i64,
    },

    #[error("Field '{field}' has no type levels")]
    EmptyType { field: String },

    #[error("Field '{field}' has {count} component separators; expected 0, 1 or {nesting}")]
    InvalidSeparatorCount {
        field: String,
        count: usize,
        nesting: usize,
    },

    #[error("Field name '{field}' is empty or contains the reserved key delimiter '@'")]
    InvalidFieldName { field: String },

    #[error("Field '{field}' has {actual} cardinality entries; expected {expected}")]
    InvalidCardinalityLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to store field metadata {attribute} for field '{field}' on {entity_type} with id {entity_id}: {source}")]
    Backend {
        field: String,
        attribute: AttributeSuffix,
        entity_type: EntityType,
        entity_id: i64,
        #[source]
        source: StoreError,
    },

    #[error("{operation} is not implemented (field '{field}')")]
    NotImplemented {
        operation: &'static str,
        field: String,
    },
}

impl EncodeError {
    pub fn kind(&self) -> EncodeErrorKind {
        match self {
            EncodeError::Backend { .. } => EncodeErrorKind::Backend,
            EncodeError::NotImplemented { .. } => EncodeErrorKind::NotImplemented,
            _ => EncodeErrorKind::Validation,
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::InvalidNesting { .. } => "FIELD_INVALID_NESTING",
            EncodeError::WrongFieldType { .. } => "FIELD_WRONG_TYPE",
            EncodeError::CardinalityMismatch { .. } => "FIELD_CARDINALITY_MISMATCH",
            EncodeError::EmptyType { .. } => "FIELD_EMPTY_TYPE",
            EncodeError::InvalidSeparatorCount { .. } => "FIELD_INVALID_SEPARATOR_COUNT",
            EncodeError::InvalidFieldName { .. } => "FIELD_INVALID_NAME",
            EncodeError::InvalidCardinalityLength { .. } => "FIELD_INVALID_CARDINALITY_LENGTH",
            EncodeError::Backend { .. } => "FIELD_BACKEND_FAILURE",
            EncodeError::NotImplemented { .. } => "FIELD_NOT_IMPLEMENTED",
        }
    }

    /// The code reported to diagnostics: the store's code for backend
    /// failures, the field code otherwise.
    pub fn status_code(&self) -> &'static str {
        match self {
            EncodeError::Backend { source, .. } => source.code().code(),
            other => other.code(),
        }
    }

    /// Name of the field the failing call was made for
    pub fn field(&self) -> &str {
        match self {
            EncodeError::InvalidNesting { field, .. }
            | EncodeError::WrongFieldType { field, .. }
            | EncodeError::CardinalityMismatch { field, .. }
            | EncodeError::EmptyType { field }
            | EncodeError::InvalidSeparatorCount { field, .. }
            | EncodeError::InvalidFieldName { field }
            | EncodeError::InvalidCardinalityLength { field, .. }
            | EncodeError::Backend { field, .. }
            | EncodeError::NotImplemented { field, .. } => field,
        }
    }
}

/// Field metadata decode errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Field '{field}' has no {attribute} attribute on {entity_type} with id {entity_id}")]
    MissingAttribute {
        field: String,
        attribute: AttributeSuffix,
        entity_type: EntityType,
        entity_id: i64,
    },

    #[error("Field '{field}' {attribute} attribute holds a {found} value; expected {expected}")]
    UnexpectedValueKind {
        field: String,
        attribute: AttributeSuffix,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field '{field}' level {level} of type {field_type} has no component naming")]
    UnsupportedComponentType {
        field: String,
        level: usize,
        field_type: FieldType,
    },

    #[error("Field '{field}' level {level} expects {expected} components but {actual} are available")]
    ComponentCountMismatch {
        field: String,
        level: usize,
        expected: i64,
        actual: usize,
    },

    #[error("Field '{field}' expands to more than {limit} components")]
    TooManyComponents { field: String, limit: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::MissingAttribute { .. } => "FIELD_MISSING_ATTRIBUTE",
            DecodeError::UnexpectedValueKind { .. } => "FIELD_UNEXPECTED_VALUE_KIND",
            DecodeError::UnsupportedComponentType { .. } => "FIELD_UNSUPPORTED_COMPONENT_TYPE",
            DecodeError::ComponentCountMismatch { .. } => "FIELD_COMPONENT_COUNT_MISMATCH",
            DecodeError::TooManyComponents { .. } => "FIELD_TOO_MANY_COMPONENTS",
            DecodeError::Store(e) => e.code().code(),
        }
    }
}
