//! Validation Error Model
use thiserror::Error;

/// Raised when a block or record is constructed from values that do not
/// fit its declared schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("VALIDATION/MISSING: {block}.{field} is required")]
    MissingField { block: String, field: String },

    #[error("VALIDATION/UNKNOWN: {block} declares no field named {field}")]
    UnknownField { block: String, field: String },

    #[error("VALIDATION/DUPLICATE: {block}.{field} supplied more than once")]
    DuplicateField { block: String, field: String },

    #[error("VALIDATION/TYPE: {field} expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("VALIDATION/VALUE: {field} = {value:?} is not one of [{allowed}]")]
    InvalidValue {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("VALIDATION/LABEL: {block} renders two fields as <{label}>")]
    DuplicateLabel { block: String, label: String },

    #[error("VALIDATION/LABEL: {block}.{label} clashes with the reserved list element name")]
    ReservedLabel { block: String, label: String },

    #[error("VALIDATION/LABEL: {block} cannot render {label:?} as an element name")]
    InvalidLabel { block: String, label: String },

    #[error("VALIDATION/MALFORMED: {0}")]
    Malformed(String),
}
