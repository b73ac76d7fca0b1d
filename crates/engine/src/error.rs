//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a request carries missing or malformed fields.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ExistingKey`] thrown when a slug, title or username is already taken.
//! - [`Unauthorized`] thrown when credentials or bearer tokens are rejected.
//! - [`Forbidden`] thrown when the caller's management level is not allowed.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::KeyNotFound(_) => "not_found",
            Self::ExistingKey(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
