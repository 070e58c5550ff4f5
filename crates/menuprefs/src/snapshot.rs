//! Normalized save snapshots.
//!
//! A snapshot is the comparison-ready form of the editable state: the
//! persistable payload plus a BLAKE3 fingerprint over a canonical field
//! ordering. Two snapshots with equal fingerprints represent the same
//! persisted state, regardless of the incidental ordering of hidden or
//! target id lists.

use serde_json::Value;

use crate::entry::{collect_hidden_ids, MenuEntry};
use crate::prefs::{ApplyMode, PortalVariant, StoredPreferences};

/// A normalized snapshot of the editor's persistable state.
#[derive(Debug, Clone)]
pub struct SaveSnapshot {
    portal: PortalVariant,
    payload: StoredPreferences,
    digest: String,
}

impl SaveSnapshot {
    /// Capture a snapshot of the current editable state.
    ///
    /// `menu_order` is recorded for the CRM portal only (the client portal
    /// has a fixed catalog order); hidden and target id lists are sorted so
    /// comparison is order-independent; `apply_mode` and `target_ids` are
    /// recorded for the client portal only.
    #[must_use]
    pub fn capture(
        tree: &[MenuEntry],
        portal: PortalVariant,
        apply_mode: ApplyMode,
        target_ids: &[String],
    ) -> Self {
        let menu_order: Vec<String> = match portal {
            PortalVariant::Crm => tree.iter().map(|e| e.id.clone()).collect(),
            PortalVariant::Client => Vec::new(),
        };
        let mut hidden_items = collect_hidden_ids(tree);
        hidden_items.sort();

        let (apply_mode, target_ids) = match portal {
            PortalVariant::Crm => (None, Vec::new()),
            PortalVariant::Client => {
                let mut targets = target_ids.to_vec();
                targets.sort();
                (Some(apply_mode), targets)
            }
        };

        let digest = fingerprint(portal, &menu_order, &hidden_items, apply_mode, &target_ids);
        let payload = StoredPreferences {
            menu_order: menu_order.into_iter().map(Value::String).collect(),
            hidden_items,
            apply_mode,
            target_ids,
        };

        Self {
            portal,
            payload,
            digest,
        }
    }

    /// The portal this snapshot belongs to.
    #[must_use]
    pub fn portal(&self) -> PortalVariant {
        self.portal
    }

    /// The payload to persist through the preferences API.
    #[must_use]
    pub fn payload(&self) -> &StoredPreferences {
        &self.payload
    }

    /// The BLAKE3 fingerprint of the canonical state.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl PartialEq for SaveSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl Eq for SaveSnapshot {}

fn fingerprint(
    portal: PortalVariant,
    menu_order: &[String],
    hidden_items: &[String],
    apply_mode: Option<ApplyMode>,
    target_ids: &[String],
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(portal.to_string().as_bytes());
    for section in [menu_order, hidden_items, target_ids] {
        hasher.update(b"\x1e");
        for id in section {
            hasher.update(id.as_bytes());
            hasher.update(b"\x1f");
        }
    }
    hasher.update(b"\x1e");
    if let Some(mode) = apply_mode {
        hasher.update(format!("{mode:?}").as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
