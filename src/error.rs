use thiserror::Error;

use crate::model::{FieldKind, LineItemField};

/// Contract breaches reported by the line-item mutation API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("no client selected; line items cannot be added")]
    NoClientSelected,
    #[error("line item {index} does not exist (draft has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("the last remaining line item cannot be removed")]
    LastLineItem,
    #[error("field `{0}` is computed and cannot be edited")]
    ReadOnlyField(LineItemField),
    #[error("field `{field}` expects a {expected} value")]
    TypeMismatch {
        field: LineItemField,
        expected: FieldKind,
    },
    #[error("field `{0}` must be a finite number")]
    NonFiniteNumber(LineItemField),
    #[error("quantity cannot be negative (got {0})")]
    NegativeQuantity(f64),
}

/// Raw user input rejected before it reaches the mutation API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("`{raw}` is not a number (field `{field}`)")]
    NotANumber { field: LineItemField, raw: String },
    #[error("unknown line item field `{0}`")]
    UnknownField(String),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("no invoice draft is loaded")]
    NoDraftLoaded,
    #[error("draft `{0}` not found")]
    DraftNotFound(String),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, DraftError>;
