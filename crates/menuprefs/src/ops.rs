//! Pure mutation operations over the menu tree.
//!
//! Every operation takes the current tree and returns a new one; callers
//! swap the result in wholesale. Operations locate entries at arbitrary
//! depth via recursive descent. Structurally invalid requests (unknown
//! parents, out-of-range indices, moves into a node's own subtree) are
//! silent no-ops.

use crate::entry::MenuEntry;

/// Flip the visibility of the entry with the given id.
///
/// When the entry is a group, the new value is propagated to every
/// descendant, overriding each child's prior individual state.
#[must_use]
pub fn toggle_visibility(tree: &[MenuEntry], id: &str) -> Vec<MenuEntry> {
    tree.iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if entry.id == id {
                let next = !entry.visible;
                set_subtree_visible(&mut entry, next);
            } else if let Some(children) = entry.children_mut() {
                *children = toggle_visibility(children, id);
            }
            entry
        })
        .collect()
}

fn set_subtree_visible(entry: &mut MenuEntry, visible: bool) {
    entry.visible = visible;
    if let Some(children) = entry.children_mut() {
        for child in children {
            set_subtree_visible(child, visible);
        }
    }
}

/// Flip the transient expanded flag of a top-level group.
#[must_use]
pub fn toggle_group_expanded(tree: &[MenuEntry], id: &str) -> Vec<MenuEntry> {
    tree.iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if entry.id == id && entry.is_group() {
                entry.expanded = !entry.expanded;
            }
            entry
        })
        .collect()
}

/// Insert an entry, replacing any sibling with the same id.
///
/// With no parent the entry is upserted at top level. With a parent id the
/// group is located at any depth, the entry upserted into its children, and
/// the group forced expanded so the new item is visible immediately. An
/// unknown parent id leaves the tree unchanged.
#[must_use]
pub fn add_entry(tree: &[MenuEntry], entry: MenuEntry, parent_id: Option<&str>) -> Vec<MenuEntry> {
    match parent_id {
        None => {
            let mut next: Vec<MenuEntry> =
                tree.iter().filter(|e| e.id != entry.id).cloned().collect();
            next.push(entry);
            next
        }
        Some(parent) => {
            let mut next = tree.to_vec();
            add_into_group(&mut next, &entry, parent);
            next
        }
    }
}

fn add_into_group(tree: &mut [MenuEntry], entry: &MenuEntry, parent: &str) {
    for candidate in tree {
        if candidate.id == parent {
            if candidate.is_group() {
                candidate.expanded = true;
            }
            if let Some(children) = candidate.children_mut() {
                children.retain(|c| c.id != entry.id);
                children.push(entry.clone());
            }
            return;
        }
        if let Some(children) = candidate.children_mut() {
            add_into_group(children, entry, parent);
        }
    }
}

/// Replace the entry with the given id wholesale, at any depth.
///
/// A group's replacement must carry over or re-specify its children;
/// callers preserve them when unchanged.
#[must_use]
pub fn update_entry(tree: &[MenuEntry], id: &str, new_entry: &MenuEntry) -> Vec<MenuEntry> {
    tree.iter()
        .map(|entry| {
            if entry.id == id {
                return new_entry.clone();
            }
            let mut entry = entry.clone();
            if let Some(children) = entry.children_mut() {
                *children = update_entry(children, id, new_entry);
            }
            entry
        })
        .collect()
}

/// Remove the entry with the given id, and its subtree, from wherever it
/// appears.
#[must_use]
pub fn delete_entry(tree: &[MenuEntry], id: &str) -> Vec<MenuEntry> {
    tree.iter()
        .filter(|entry| entry.id != id)
        .map(|entry| {
            let mut entry = entry.clone();
            if let Some(children) = entry.children_mut() {
                *children = delete_entry(children, id);
            }
            entry
        })
        .collect()
}

/// Relocate one entry between sibling lists.
///
/// `None` as a parent id names the top-level list; `Some(id)` names the
/// children of the group with that id, found at any depth. The node is
/// spliced out of the source list and spliced into the destination list at
/// `dest_index` (clamped to the list length) — a single contiguous move,
/// never a duplication. The move is a no-op when source and destination
/// position are identical, when either parent cannot be resolved, when
/// `source_index` is out of range, or when the destination parent is the
/// moved node itself or any of its descendants.
#[must_use]
pub fn move_entry(
    tree: &[MenuEntry],
    source_index: usize,
    source_parent: Option<&str>,
    dest_index: usize,
    dest_parent: Option<&str>,
) -> Vec<MenuEntry> {
    let unchanged = tree.to_vec();
    if source_parent == dest_parent && source_index == dest_index {
        return unchanged;
    }

    let Some(source_list) = sibling_list(tree, source_parent) else {
        return unchanged;
    };
    let Some(node) = source_list.get(source_index).cloned() else {
        return unchanged;
    };
    // Cycle prevention: a node may not become its own descendant.
    if dest_parent.is_some_and(|dp| node.subtree_contains(dp)) {
        return unchanged;
    }
    if sibling_list(tree, dest_parent).is_none() {
        return unchanged;
    }

    let mut next = unchanged;
    if let Some(list) = sibling_list_mut(&mut next, source_parent) {
        list.remove(source_index);
    }
    if let Some(list) = sibling_list_mut(&mut next, dest_parent) {
        let index = dest_index.min(list.len());
        list.insert(index, node);
    }
    next
}

fn sibling_list<'a>(tree: &'a [MenuEntry], parent: Option<&str>) -> Option<&'a [MenuEntry]> {
    match parent {
        None => Some(tree),
        Some(id) => crate::entry::find_entry(tree, id).and_then(MenuEntry::children),
    }
}

fn sibling_list_mut<'a>(
    tree: &'a mut Vec<MenuEntry>,
    parent: Option<&str>,
) -> Option<&'a mut Vec<MenuEntry>> {
    match parent {
        None => Some(tree),
        Some(id) => find_group_mut(tree, id).and_then(MenuEntry::children_mut),
    }
}

fn find_group_mut<'a>(tree: &'a mut [MenuEntry], id: &str) -> Option<&'a mut MenuEntry> {
    for entry in tree {
        if entry.id == id {
            return Some(entry);
        }
        if let Some(children) = entry.children_mut() {
            if let Some(found) = find_group_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}
