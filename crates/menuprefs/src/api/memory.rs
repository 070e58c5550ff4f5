//! In-memory preferences backend for development and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ApiError, PreferencesApi, Result};
use crate::prefs::{PortalVariant, Recipient, StoredPreferences};

/// A preferences backend held entirely in memory.
///
/// Supports failure injection and counts successful saves so tests can
/// assert on debounce coalescing and retry behavior.
#[derive(Debug, Default)]
pub struct InMemoryPreferencesApi {
    store: Mutex<HashMap<PortalVariant, StoredPreferences>>,
    recipients: Mutex<Vec<Recipient>>,
    fail_fetch: AtomicBool,
    fail_save: AtomicBool,
    fail_recipients: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryPreferencesApi {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored preferences for a portal.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn seed(&self, portal: PortalVariant, prefs: StoredPreferences) {
        self.store.lock().unwrap().insert(portal, prefs);
    }

    /// Seed the recipient directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn seed_recipients(&self, recipients: Vec<Recipient>) {
        *self.recipients.lock().unwrap() = recipients;
    }

    /// Make subsequent fetches fail.
    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail.
    pub fn fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent recipient fetches fail.
    pub fn fail_recipients(&self, fail: bool) {
        self.fail_recipients.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The currently stored preferences for a portal, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stored(&self, portal: PortalVariant) -> Option<StoredPreferences> {
        self.store.lock().unwrap().get(&portal).cloned()
    }
}

#[async_trait::async_trait]
impl PreferencesApi for InMemoryPreferencesApi {
    async fn fetch(&self, portal: PortalVariant) -> Result<StoredPreferences> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("injected fetch failure".to_string()));
        }
        let store = self.store.lock().map_err(|_| poisoned())?;
        Ok(store.get(&portal).cloned().unwrap_or_default())
    }

    async fn save(&self, portal: PortalVariant, prefs: &StoredPreferences) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("injected save failure".to_string()));
        }
        let mut store = self.store.lock().map_err(|_| poisoned())?;
        store.insert(portal, prefs.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn recipients(&self) -> Result<Vec<Recipient>> {
        if self.fail_recipients.load(Ordering::SeqCst) {
            return Err(ApiError::Transport(
                "injected recipients failure".to_string(),
            ));
        }
        let recipients = self.recipients.lock().map_err(|_| poisoned())?;
        Ok(recipients.clone())
    }
}

fn poisoned() -> ApiError {
    ApiError::Transport("in-memory store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_defaults_to_empty_preferences() {
        let api = InMemoryPreferencesApi::new();
        let prefs = api.fetch(PortalVariant::Crm).await.unwrap();
        assert_eq!(prefs, StoredPreferences::default());
    }

    #[tokio::test]
    async fn test_save_then_fetch_round_trips() {
        let api = InMemoryPreferencesApi::new();
        let prefs = StoredPreferences {
            hidden_items: vec!["calendar".to_string()],
            ..StoredPreferences::default()
        };
        api.save(PortalVariant::Crm, &prefs).await.unwrap();

        assert_eq!(api.fetch(PortalVariant::Crm).await.unwrap(), prefs);
        assert_eq!(api.save_count(), 1);
    }

    #[tokio::test]
    async fn test_portals_are_isolated() {
        let api = InMemoryPreferencesApi::new();
        let prefs = StoredPreferences {
            hidden_items: vec!["offers".to_string()],
            ..StoredPreferences::default()
        };
        api.save(PortalVariant::Client, &prefs).await.unwrap();

        assert_eq!(
            api.fetch(PortalVariant::Crm).await.unwrap(),
            StoredPreferences::default()
        );
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let api = InMemoryPreferencesApi::new();
        api.fail_fetch(true);
        assert!(api.fetch(PortalVariant::Crm).await.is_err());

        api.fail_save(true);
        let err = api
            .save(PortalVariant::Crm, &StoredPreferences::default())
            .await;
        assert!(err.is_err());
        assert_eq!(api.save_count(), 0);

        api.fail_recipients(true);
        assert!(api.recipients().await.is_err());
    }

    #[tokio::test]
    async fn test_recipients_seeded() {
        let api = InMemoryPreferencesApi::new();
        api.seed_recipients(vec![Recipient {
            id: "c1".to_string(),
            label: "Ada".to_string(),
        }]);
        let recipients = api.recipients().await.unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].id, "c1");
    }
}
