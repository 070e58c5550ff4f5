//! HTTP implementation of the preferences backend.

use std::time::Duration;

use tracing::debug;

use super::{ApiError, PreferencesApi, Result};
use crate::prefs::{PortalVariant, Recipient, StoredPreferences};

/// Preferences backend reached over HTTP.
///
/// Routes are `{base}/portals/{portal}/menu-preferences` for fetch/save and
/// `{base}/recipients` for the targeting directory. The exact wire shape is
/// owned by the backend; this client only round-trips the tolerant
/// [`StoredPreferences`] type.
#[derive(Debug, Clone)]
pub struct HttpPreferencesApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPreferencesApi {
    /// Create a client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn preferences_url(&self, portal: PortalVariant) -> String {
        format!("{}/portals/{portal}/menu-preferences", self.base_url)
    }

    fn recipients_url(&self) -> String {
        format!("{}/recipients", self.base_url)
    }
}

fn transport(err: &reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            code: status.as_u16(),
        })
    }
}

#[async_trait::async_trait]
impl PreferencesApi for HttpPreferencesApi {
    async fn fetch(&self, portal: PortalVariant) -> Result<StoredPreferences> {
        let url = self.preferences_url(portal);
        debug!(%url, "fetching stored preferences");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        check_status(&response)?;
        let body = response.text().await.map_err(|e| transport(&e))?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn save(&self, portal: PortalVariant, prefs: &StoredPreferences) -> Result<()> {
        let url = self.preferences_url(portal);
        debug!(%url, "persisting preferences");
        let response = self
            .client
            .put(&url)
            .json(prefs)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        check_status(&response)
    }

    async fn recipients(&self) -> Result<Vec<Recipient>> {
        let response = self
            .client
            .get(self.recipients_url())
            .send()
            .await
            .map_err(|e| transport(&e))?;
        check_status(&response)?;
        let body = response.text().await.map_err(|e| transport(&e))?;
        Ok(serde_json::from_str(&body)?)
    }
}
