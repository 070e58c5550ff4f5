//! Preferences backend collaborator.
//!
//! The backend owns preference storage and the recipient directory; this
//! crate only talks to it through the [`PreferencesApi`] trait. The HTTP
//! implementation lives in [`http`], an in-memory double for development
//! and tests in [`memory`].

pub mod http;
pub mod memory;

use thiserror::Error;

use crate::prefs::{PortalVariant, Recipient, StoredPreferences};

pub use http::HttpPreferencesApi;
pub use memory::InMemoryPreferencesApi;

/// Errors surfaced by the preferences backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status code.
    #[error("backend returned status {code}")]
    Status {
        /// The HTTP status code.
        code: u16,
    },

    /// The request never completed (connectivity, timeout, DNS).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend's response body could not be decoded.
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Access to the externally stored menu preferences.
///
/// All operations are best-effort from this crate's perspective: a failure
/// never rolls back in-memory state, it only surfaces as a status change.
#[async_trait::async_trait]
pub trait PreferencesApi: Send + Sync {
    /// Fetch the stored preferences for a portal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with a
    /// failure status; callers fall back to the default catalog.
    async fn fetch(&self, portal: PortalVariant) -> Result<StoredPreferences>;

    /// Persist the preferences for a portal.
    ///
    /// # Errors
    ///
    /// Returns an error if the write does not complete; callers keep their
    /// in-memory state and retry on the next change.
    async fn save(&self, portal: PortalVariant, prefs: &StoredPreferences) -> Result<()>;

    /// Fetch the recipient directory for the client-portal targeting
    /// picker.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be fetched; callers
    /// tolerate this with an empty list.
    async fn recipients(&self) -> Result<Vec<Recipient>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status { code: 503 };
        assert_eq!(err.to_string(), "backend returned status 503");

        let err = ApiError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_api_error_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not json");
        if let Err(json_err) = json_result {
            let err: ApiError = json_err.into();
            assert!(matches!(err, ApiError::Decode(_)));
        }
    }
}
