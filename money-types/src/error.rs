//! Error types for money parsing, arithmetic and casting.

use crate::domain::{CurrencyCode, RecordId};

/// Domain-level errors (parsing and arithmetic rule violations).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The input had an accepted kind but its value is not a valid amount.
    #[error("Unable to parse {input}")]
    Parse { input: String },

    /// The input is not one of the accepted kinds at all.
    #[error("Invalid data provided for {target}")]
    InvalidInput { target: String },

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        got: CurrencyCode,
    },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid currency definition: {0}")]
    InvalidCurrency(String),
}

impl DomainError {
    pub(crate) fn parse(input: impl Into<String>) -> Self {
        DomainError::Parse {
            input: input.into(),
        }
    }
}

/// Repository-level errors (record store failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Record not found")]
    NotFound,
}

/// Cast-level errors (attribute access and persistence of cast models).
///
/// Maps the lower layers onto what a caller of the cast service can act on.
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute {0} is not cast to money")]
    NotMoney(String),

    #[error("Attribute {0} is cast to money and must be assigned through the caster")]
    MoneyAttribute(String),

    #[error("{model} {id} not found")]
    NotFound { model: String, id: RecordId },
}

impl From<RepoError> for CastError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => CastError::Domain(e),
            RepoError::Database(e) => CastError::Storage(e),
            RepoError::InvalidSchema(e) => CastError::Storage(e),
            RepoError::NotFound => CastError::Storage("record not found".into()),
        }
    }
}
