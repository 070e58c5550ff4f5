//! Error types for menuprefs.
//!
//! This module defines the crate-level error type. Backend failures keep
//! their own taxonomy in [`crate::api::ApiError`] and are wrapped here when
//! they cross into crate-level operations.

use thiserror::Error;

use crate::api::ApiError;

/// The main error type for menuprefs operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// A catalog spec is internally inconsistent.
    #[error("invalid catalog spec for portal '{portal}': {message}")]
    CatalogInvalid {
        /// Portal whose spec failed validation.
        portal: String,
        /// Description of the inconsistency.
        message: String,
    },

    // === Backend Errors ===
    /// The preferences backend failed.
    #[error("preferences backend error: {0}")]
    Api(#[from] ApiError),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for menuprefs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a catalog validation error.
    #[must_use]
    pub fn catalog_invalid(portal: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogInvalid {
            portal: portal.into(),
            message: message.into(),
        }
    }

    /// Check if this error originated at the preferences backend.
    #[must_use]
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}
