//! Navigation menu tree model.
//!
//! This module defines the fundamental data structure for a portal's
//! navigation menu: a shallow tree of groups and links that operators can
//! reorder, hide, and extend.

use serde::{Deserialize, Serialize};

/// The payload of a menu entry.
///
/// A link never carries children and a group never carries a path; the
/// tagged enum makes both invariants unrepresentable rather than checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// A leaf entry pointing at a route.
    Link {
        /// Route path, if the entry navigates anywhere.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// A grouping entry owning an ordered list of children.
    Group {
        /// Ordered children of this group.
        #[serde(default)]
        children: Vec<MenuEntry>,
    },
}

/// A single entry in a portal's navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Stable unique key within the portal's catalog.
    pub id: String,

    /// Display label. Localization happens at render time; opaque here.
    pub label: String,

    /// Whether the entry is shown in the rendered menu.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Whether a group is expanded in the editor. Transient UI state,
    /// never persisted.
    #[serde(skip_serializing, default = "default_true")]
    pub expanded: bool,

    /// Link or group payload.
    #[serde(flatten)]
    pub kind: EntryKind,
}

fn default_true() -> bool {
    true
}

impl MenuEntry {
    /// Create a visible link entry.
    #[must_use]
    pub fn link(id: impl Into<String>, label: impl Into<String>, path: Option<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            visible: true,
            expanded: true,
            kind: EntryKind::Link { path },
        }
    }

    /// Create a visible, expanded group entry with the given children.
    #[must_use]
    pub fn group(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Vec<MenuEntry>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            visible: true,
            expanded: true,
            kind: EntryKind::Group { children },
        }
    }

    /// Whether this entry is a group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, EntryKind::Group { .. })
    }

    /// The children of this entry, if it is a group.
    #[must_use]
    pub fn children(&self) -> Option<&[MenuEntry]> {
        match &self.kind {
            EntryKind::Group { children } => Some(children),
            EntryKind::Link { .. } => None,
        }
    }

    /// Mutable access to the children of this entry, if it is a group.
    pub fn children_mut(&mut self) -> Option<&mut Vec<MenuEntry>> {
        match &mut self.kind {
            EntryKind::Group { children } => Some(children),
            EntryKind::Link { .. } => None,
        }
    }

    /// The route path of this entry, if it is a link with one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Link { path } => path.as_deref(),
            EntryKind::Group { .. } => None,
        }
    }

    /// Whether `id` names this entry or any entry in its subtree.
    #[must_use]
    pub fn subtree_contains(&self, id: &str) -> bool {
        if self.id == id {
            return true;
        }
        self.children()
            .is_some_and(|children| children.iter().any(|c| c.subtree_contains(id)))
    }
}

/// Find an entry by id at any depth.
#[must_use]
pub fn find_entry<'a>(tree: &'a [MenuEntry], id: &str) -> Option<&'a MenuEntry> {
    for entry in tree {
        if entry.id == id {
            return Some(entry);
        }
        if let Some(children) = entry.children() {
            if let Some(found) = find_entry(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Collect the ids of all hidden entries at any depth, in tree order.
#[must_use]
pub fn collect_hidden_ids(tree: &[MenuEntry]) -> Vec<String> {
    let mut hidden = Vec::new();
    collect_hidden_into(tree, &mut hidden);
    hidden
}

fn collect_hidden_into(tree: &[MenuEntry], out: &mut Vec<String>) {
    for entry in tree {
        if !entry.visible {
            out.push(entry.id.clone());
        }
        if let Some(children) = entry.children() {
            collect_hidden_into(children, out);
        }
    }
}

/// Count occurrences of an id across the whole tree.
#[must_use]
pub fn count_occurrences(tree: &[MenuEntry], id: &str) -> usize {
    tree.iter()
        .map(|entry| {
            let own = usize::from(entry.id == id);
            let nested = entry
                .children()
                .map_or(0, |children| count_occurrences(children, id));
            own + nested
        })
        .sum()
}
