//! Merging stored preferences onto the default catalog.
//!
//! Reconciliation keeps the operator's saved ordering, surfaces catalog
//! entries the stored order predates, and applies the stored hidden set.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::entry::MenuEntry;
use crate::prefs::{normalize_order, PortalVariant, StoredPreferences};

/// Reorder the top level of `catalog` to match a stored order.
///
/// Walks the normalized order list emitting known entries in stored order,
/// consuming each id at most once, then appends catalog entries the stored
/// order never mentioned, preserving their original relative order. Entries
/// newly introduced to the catalog therefore surface even when the stored
/// order predates them.
#[must_use]
pub fn reconcile_order(catalog: &[MenuEntry], raw_order: &[Value]) -> Vec<MenuEntry> {
    let order = normalize_order(raw_order);
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(catalog.len());

    for id in &order {
        if let Some(entry) = catalog.iter().find(|e| e.id == *id) {
            if consumed.insert(entry.id.as_str()) {
                merged.push(entry.clone());
            }
        }
    }
    for entry in catalog {
        if !consumed.contains(entry.id.as_str()) {
            merged.push(entry.clone());
        }
    }
    merged
}

/// Rewrite every node's visibility from a flat hidden-id set.
///
/// Children are processed independently of their parent: a visible group
/// may contain hidden children and vice versa.
#[must_use]
pub fn apply_hidden(tree: &[MenuEntry], hidden: &HashSet<String>) -> Vec<MenuEntry> {
    tree.iter()
        .map(|entry| {
            let mut entry = entry.clone();
            entry.visible = !hidden.contains(&entry.id);
            if let Some(children) = entry.children_mut() {
                *children = apply_hidden(children, hidden);
            }
            entry
        })
        .collect()
}

/// Merge stored preferences onto a default catalog.
///
/// The CRM portal applies ordering then visibility; the client portal has a
/// fixed catalog order and applies visibility only.
#[must_use]
pub fn reconcile(
    catalog: &[MenuEntry],
    prefs: &StoredPreferences,
    portal: PortalVariant,
) -> Vec<MenuEntry> {
    let ordered = match portal {
        PortalVariant::Crm => reconcile_order(catalog, &prefs.menu_order),
        PortalVariant::Client => catalog.to_vec(),
    };
    let hidden: HashSet<String> = prefs.hidden_items.iter().cloned().collect();
    debug!(
        portal = %portal,
        hidden = hidden.len(),
        "reconciled stored preferences onto catalog"
    );
    apply_hidden(&ordered, &hidden)
}
