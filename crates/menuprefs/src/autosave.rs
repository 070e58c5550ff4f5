//! Debounced autosave scheduling.
//!
//! Rapid consecutive edits within the debounce window coalesce into a
//! single persistence call. The scheduler owns at most one pending save;
//! scheduling a new one cancels the previous, and dropping the scheduler
//! cancels whatever is pending so nothing writes after teardown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{ApiError, PreferencesApi};
use crate::snapshot::SaveSnapshot;

/// Persistence status of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    /// Nothing has changed since load.
    #[default]
    Idle,
    /// A change is pending or a save is in flight.
    Saving,
    /// The latest change was persisted.
    Saved,
    /// The last load or save attempt failed; editing continues and the
    /// next change retries.
    Error,
}

impl std::fmt::Display for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Saving => write!(f, "saving"),
            Self::Saved => write!(f, "saved"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The result of one completed save attempt.
#[derive(Debug)]
pub struct SaveOutcome {
    /// The snapshot the attempt tried to persist.
    pub snapshot: SaveSnapshot,
    /// Success, or why the attempt failed.
    pub result: Result<(), ApiError>,
}

/// Schedules debounced saves against the preferences backend.
pub struct AutosaveScheduler {
    api: Arc<dyn PreferencesApi>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<SaveOutcome>,
}

impl AutosaveScheduler {
    /// Create a scheduler and the channel its outcomes arrive on.
    #[must_use]
    pub fn new(
        api: Arc<dyn PreferencesApi>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SaveOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                debounce,
                pending: None,
                outcomes,
            },
            rx,
        )
    }

    /// Schedule a save of `snapshot` after the debounce window.
    ///
    /// Cancels any previously pending save, so only the most recent
    /// snapshot within the window is persisted.
    pub fn schedule(&mut self, snapshot: SaveSnapshot) {
        self.cancel();
        debug!(debounce_ms = self.debounce.as_millis() as u64, "save scheduled");

        let api = Arc::clone(&self.api);
        let debounce = self.debounce;
        let outcomes = self.outcomes.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = api.save(snapshot.portal(), snapshot.payload()).await;
            if let Err(err) = &result {
                warn!(error = %err, "autosave attempt failed");
            }
            // The receiver may be gone if the editor was torn down.
            let _ = outcomes.send(SaveOutcome { snapshot, result });
        }));
    }

    /// Cancel the pending save, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a save is currently pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl std::fmt::Debug for AutosaveScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveScheduler")
            .field("debounce", &self.debounce)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryPreferencesApi;
    use crate::entry::MenuEntry;
    use crate::prefs::{ApplyMode, PortalVariant};

    fn snapshot(ids: &[&str]) -> SaveSnapshot {
        let tree: Vec<MenuEntry> = ids
            .iter()
            .map(|id| MenuEntry::link(*id, id.to_uppercase(), None))
            .collect();
        SaveSnapshot::capture(&tree, PortalVariant::Crm, ApplyMode::All, &[])
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_fires_after_debounce() {
        let api = Arc::new(InMemoryPreferencesApi::new());
        let (mut scheduler, mut rx) =
            AutosaveScheduler::new(Arc::clone(&api) as Arc<dyn PreferencesApi>, Duration::from_millis(500));

        scheduler.schedule(snapshot(&["a"]));
        let outcome = rx.recv().await.unwrap();
        assert!(outcome.result.is_ok());
        assert_eq!(api.save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_schedules_coalesce_to_one_save() {
        let api = Arc::new(InMemoryPreferencesApi::new());
        let (mut scheduler, mut rx) =
            AutosaveScheduler::new(Arc::clone(&api) as Arc<dyn PreferencesApi>, Duration::from_millis(500));

        for ids in [
            &["a"][..],
            &["a", "b"][..],
            &["a", "b", "c"][..],
            &["c", "a"][..],
            &["c"][..],
        ] {
            scheduler.schedule(snapshot(ids));
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        let outcome = rx.recv().await.unwrap();
        assert_eq!(api.save_count(), 1);
        // The persisted payload reflects the final state.
        let order: Vec<_> = outcome
            .snapshot
            .payload()
            .menu_order
            .iter()
            .filter_map(serde_json::Value::as_str)
            .collect();
        assert_eq!(order, vec!["c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_save() {
        let api = Arc::new(InMemoryPreferencesApi::new());
        let (mut scheduler, mut rx) =
            AutosaveScheduler::new(Arc::clone(&api) as Arc<dyn PreferencesApi>, Duration::from_millis(500));

        scheduler.schedule(snapshot(&["a"]));
        scheduler.cancel();
        tokio::time::advance(Duration::from_millis(600)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(api.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_save() {
        let api = Arc::new(InMemoryPreferencesApi::new());
        let (mut scheduler, mut rx) =
            AutosaveScheduler::new(Arc::clone(&api) as Arc<dyn PreferencesApi>, Duration::from_millis(500));

        scheduler.schedule(snapshot(&["a"]));
        drop(scheduler);
        tokio::time::advance(Duration::from_millis(600)).await;

        assert!(rx.recv().await.is_none());
        assert_eq!(api.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_reports_error_outcome() {
        let api = Arc::new(InMemoryPreferencesApi::new());
        api.fail_save(true);
        let (mut scheduler, mut rx) =
            AutosaveScheduler::new(Arc::clone(&api) as Arc<dyn PreferencesApi>, Duration::from_millis(500));

        scheduler.schedule(snapshot(&["a"]));
        let outcome = rx.recv().await.unwrap();
        assert!(outcome.result.is_err());
    }

    #[test]
    fn test_save_state_display() {
        assert_eq!(SaveState::Idle.to_string(), "idle");
        assert_eq!(SaveState::Saving.to_string(), "saving");
        assert_eq!(SaveState::Saved.to_string(), "saved");
        assert_eq!(SaveState::Error.to_string(), "error");
    }

    #[test]
    fn test_save_state_default() {
        assert_eq!(SaveState::default(), SaveState::Idle);
    }
}
