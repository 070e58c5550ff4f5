//! The menu preference editing session.
//!
//! A [`MenuPreferenceEditor`] owns the merged menu tree for one portal from
//! load to teardown. Every structural mutation rewrites the tree
//! synchronously, then runs change detection: the normalized snapshot of
//! the new state is compared against the last persisted one, and only a
//! real difference schedules a debounced save. Persistence failures never
//! roll back the in-memory tree.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::api::PreferencesApi;
use crate::autosave::{AutosaveScheduler, SaveOutcome, SaveState};
use crate::confirm::ConfirmPrompt;
use crate::entry::{find_entry, MenuEntry};
use crate::ops;
use crate::prefs::{ApplyMode, PortalVariant, Recipient};
use crate::reconcile::reconcile;
use crate::snapshot::SaveSnapshot;

/// Broadcast payload announcing that the persisted navigation changed.
///
/// Sibling views (a navigation sidebar, other open tabs) subscribe to this
/// to know when to re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuChanged {
    /// The portal whose preferences were persisted.
    pub portal: PortalVariant,
    /// When the save completed.
    pub at: DateTime<Utc>,
}

/// An editing session over one portal's menu preferences.
pub struct MenuPreferenceEditor {
    portal: PortalVariant,
    /// Pristine default catalog, kept for reset.
    catalog: Vec<MenuEntry>,
    tree: Vec<MenuEntry>,
    apply_mode: ApplyMode,
    target_ids: Vec<String>,
    recipients: Vec<Recipient>,
    state: SaveState,
    last_persisted: SaveSnapshot,
    scheduler: AutosaveScheduler,
    outcomes: mpsc::UnboundedReceiver<SaveOutcome>,
    prompt: Arc<dyn ConfirmPrompt>,
    changes: broadcast::Sender<MenuChanged>,
    last_changed_at: Option<DateTime<Utc>>,
}

impl MenuPreferenceEditor {
    /// Load an editing session: fetch stored preferences, reconcile them
    /// onto the default catalog, and seed the last-persisted snapshot from
    /// the reconciled state so mount does not schedule a no-op save.
    ///
    /// A failed preferences fetch is not fatal: the session starts from
    /// the unmodified default catalog in the `Error` state and the next
    /// successful save establishes a fresh baseline. For the client portal
    /// the recipient directory is fetched as well; a failure there degrades
    /// to an empty list.
    pub async fn load(
        portal: PortalVariant,
        catalog: Vec<MenuEntry>,
        api: Arc<dyn PreferencesApi>,
        prompt: Arc<dyn ConfirmPrompt>,
        debounce: Duration,
    ) -> Self {
        let (tree, apply_mode, target_ids, state) = match api.fetch(portal).await {
            Ok(prefs) => {
                let tree = reconcile(&catalog, &prefs, portal);
                info!(%portal, "loaded stored preferences");
                (
                    tree,
                    prefs.apply_mode.unwrap_or_default(),
                    prefs.target_ids,
                    SaveState::Idle,
                )
            }
            Err(err) => {
                warn!(%portal, error = %err, "preferences fetch failed, using default catalog");
                (catalog.clone(), ApplyMode::All, Vec::new(), SaveState::Error)
            }
        };

        let recipients = if portal == PortalVariant::Client {
            api.recipients().await.unwrap_or_else(|err| {
                warn!(error = %err, "recipient fetch failed, picker will be empty");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        let last_persisted = SaveSnapshot::capture(&tree, portal, apply_mode, &target_ids);
        let (scheduler, outcomes) = AutosaveScheduler::new(api, debounce);
        let (changes, _) = broadcast::channel(16);

        Self {
            portal,
            catalog,
            tree,
            apply_mode,
            target_ids,
            recipients,
            state,
            last_persisted,
            scheduler,
            outcomes,
            prompt,
            changes,
            last_changed_at: None,
        }
    }

    /// The portal this session edits.
    #[must_use]
    pub fn portal(&self) -> PortalVariant {
        self.portal
    }

    /// The current merged menu tree.
    #[must_use]
    pub fn tree(&self) -> &[MenuEntry] {
        &self.tree
    }

    /// The current persistence status.
    #[must_use]
    pub fn save_state(&self) -> SaveState {
        self.state
    }

    /// The client-portal targeting mode.
    #[must_use]
    pub fn apply_mode(&self) -> ApplyMode {
        self.apply_mode
    }

    /// The client-portal targeted recipient ids.
    #[must_use]
    pub fn target_ids(&self) -> &[String] {
        &self.target_ids
    }

    /// The recipient directory for the targeting picker.
    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// When the last successful CRM save completed, if any.
    #[must_use]
    pub fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        self.last_changed_at
    }

    /// Subscribe to persisted-navigation-change notifications.
    #[must_use]
    pub fn subscribe_changes(&self) -> broadcast::Receiver<MenuChanged> {
        self.changes.subscribe()
    }

    /// Flip an entry's visibility; a group toggle drives its whole subtree.
    pub fn toggle_visibility(&mut self, id: &str) {
        self.tree = ops::toggle_visibility(&self.tree, id);
        self.after_change();
    }

    /// Flip a top-level group's transient expanded flag.
    ///
    /// Expansion is UI-only state; change detection recognizes the
    /// snapshot as unchanged and schedules nothing.
    pub fn toggle_group_expanded(&mut self, id: &str) {
        self.tree = ops::toggle_group_expanded(&self.tree, id);
        self.after_change();
    }

    /// Upsert an entry at top level or into the named group.
    pub fn add_entry(&mut self, entry: MenuEntry, parent_id: Option<&str>) {
        self.tree = ops::add_entry(&self.tree, entry, parent_id);
        self.after_change();
    }

    /// Replace the entry with the given id wholesale.
    pub fn update_entry(&mut self, id: &str, entry: &MenuEntry) {
        self.tree = ops::update_entry(&self.tree, id, entry);
        self.after_change();
    }

    /// Remove an entry (and its subtree) after operator confirmation.
    ///
    /// Returns whether the entry was removed; declining the prompt aborts
    /// with no effect.
    pub async fn delete_entry(&mut self, id: &str) -> bool {
        let Some(entry) = find_entry(&self.tree, id) else {
            return false;
        };
        let message = format!("Remove \"{}\" from the menu?", entry.label);
        if !self.prompt.confirm(&message).await {
            return false;
        }
        self.tree = ops::delete_entry(&self.tree, id);
        self.after_change();
        true
    }

    /// Relocate an entry between sibling lists (the drag-and-drop
    /// primitive). Structurally invalid moves are silent no-ops.
    pub fn move_entry(
        &mut self,
        source_index: usize,
        source_parent: Option<&str>,
        dest_index: usize,
        dest_parent: Option<&str>,
    ) {
        self.tree = ops::move_entry(
            &self.tree,
            source_index,
            source_parent,
            dest_index,
            dest_parent,
        );
        self.after_change();
    }

    /// Set the client-portal targeting mode.
    pub fn set_apply_mode(&mut self, mode: ApplyMode) {
        self.apply_mode = mode;
        self.after_change();
    }

    /// Replace the client-portal target recipient set.
    pub fn set_target_ids(&mut self, ids: Vec<String>) {
        self.target_ids = ids;
        self.after_change();
    }

    /// Discard all customization after operator confirmation: restore the
    /// pristine catalog, reset targeting, and let normal change detection
    /// persist the reset state.
    ///
    /// Returns whether the reset was applied.
    pub async fn reset(&mut self) -> bool {
        if !self
            .prompt
            .confirm("Reset the menu to its defaults?")
            .await
        {
            return false;
        }
        self.tree = self.catalog.clone();
        self.apply_mode = ApplyMode::All;
        self.target_ids.clear();
        self.after_change();
        true
    }

    /// Apply any save outcomes that have already arrived.
    pub fn pump(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Wait until no save is pending, applying outcomes as they arrive.
    pub async fn settle(&mut self) {
        while self.state == SaveState::Saving {
            match self.outcomes.recv().await {
                Some(outcome) => self.apply_outcome(outcome),
                None => break,
            }
        }
        self.pump();
    }

    fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot::capture(&self.tree, self.portal, self.apply_mode, &self.target_ids)
    }

    fn after_change(&mut self) {
        let snapshot = self.snapshot();
        if snapshot.digest() == self.last_persisted.digest() {
            // Back at the persisted baseline: a pending save would write a
            // stale intermediate state, so drop it.
            self.scheduler.cancel();
            if self.state == SaveState::Saving {
                self.state = SaveState::Saved;
            }
            return;
        }
        self.state = SaveState::Saving;
        self.scheduler.schedule(snapshot);
    }

    fn apply_outcome(&mut self, outcome: SaveOutcome) {
        match outcome.result {
            Ok(()) => {
                self.last_persisted = outcome.snapshot;
                self.state = SaveState::Saved;
                if self.portal == PortalVariant::Crm {
                    let at = Utc::now();
                    self.last_changed_at = Some(at);
                    let _ = self.changes.send(MenuChanged {
                        portal: self.portal,
                        at,
                    });
                }
            }
            Err(_) => {
                self.state = SaveState::Error;
            }
        }
    }
}

impl std::fmt::Debug for MenuPreferenceEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuPreferenceEditor")
            .field("portal", &self.portal)
            .field("entries", &self.tree.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
