//! Default navigation catalogs.
//!
//! A catalog is the canonical, unmodified menu tree for a portal. It is
//! derived from a static spec (id lookup, grouping map, top-level order)
//! plus the role's permission flags, and never carries operator
//! customization.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entry::MenuEntry;
use crate::prefs::PortalVariant;

/// Definition of a single catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryDef {
    /// Display label.
    pub label: String,
    /// Route path for link entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Permission flag the role must hold for this entry to exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

/// Static description of a portal's default catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSpec {
    /// Lookup table from entry id to its definition.
    pub entries: HashMap<String, EntryDef>,
    /// Grouping map: group id to its ordered child ids.
    pub groups: HashMap<String, Vec<String>>,
    /// Top-level ordering list.
    pub order: Vec<String>,
}

impl CatalogSpec {
    /// Validate internal consistency of the spec.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first inconsistency found:
    /// duplicate ids in the top-level order or within a group's child list.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for id in &self.order {
            if !seen.insert(id) {
                return Err(format!("duplicate id '{id}' in top-level order"));
            }
        }
        for (group, children) in &self.groups {
            let mut seen = HashSet::new();
            for id in children {
                if !seen.insert(id) {
                    return Err(format!("duplicate child id '{id}' in group '{group}'"));
                }
            }
        }
        Ok(())
    }
}

/// The permission flags granted to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFlags(HashSet<String>);

impl RoleFlags {
    /// A role with every flag granted.
    #[must_use]
    pub fn all() -> Self {
        Self::granting(ALL_FLAGS.iter().copied())
    }

    /// A role granting exactly the given flags.
    pub fn granting<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(flags.into_iter().map(Into::into).collect())
    }

    /// Whether an entry with the given requirement is allowed.
    #[must_use]
    pub fn allows(&self, requires: Option<&str>) -> bool {
        requires.map_or(true, |flag| self.0.contains(flag))
    }
}

/// Every permission flag referenced by the built-in catalogs.
pub const ALL_FLAGS: &[&str] = &["manage_staff", "manage_marketing", "view_reports"];

/// Build the default catalog for a spec under the given role flags.
///
/// Walks the top-level order; an id with a grouping entry becomes a group
/// whose children are built in the grouping's listed order, anything else
/// becomes a link. Ids absent from the lookup, or whose required flag is
/// not granted, are skipped. Pure: identical inputs produce structurally
/// identical output.
#[must_use]
pub fn build_catalog(spec: &CatalogSpec, flags: &RoleFlags) -> Vec<MenuEntry> {
    let mut catalog = Vec::new();
    for id in &spec.order {
        let Some(def) = spec.entries.get(id) else {
            continue;
        };
        if !flags.allows(def.requires.as_deref()) {
            continue;
        }
        if let Some(child_ids) = spec.groups.get(id) {
            let children = child_ids
                .iter()
                .filter_map(|child_id| {
                    let child = spec.entries.get(child_id)?;
                    flags.allows(child.requires.as_deref()).then(|| {
                        MenuEntry::link(child_id.as_str(), child.label.as_str(), child.path.clone())
                    })
                })
                .collect();
            catalog.push(MenuEntry::group(id.as_str(), def.label.as_str(), children));
        } else {
            catalog.push(MenuEntry::link(id.as_str(), def.label.as_str(), def.path.clone()));
        }
    }
    catalog
}

/// Cache key for built catalogs.
///
/// Labels vary by locale and the entry set varies by role, so a rebuilt
/// catalog is only reusable for the same (portal, role, locale) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    /// Portal the catalog belongs to.
    pub portal: PortalVariant,
    /// Role identifier.
    pub role: String,
    /// Locale the labels were resolved for.
    pub locale: String,
}

/// Explicit cache of built catalogs.
///
/// Invalidation is the caller's responsibility: drop the key whenever the
/// role, locale, or permission flags feeding the build change.
#[derive(Debug, Default)]
pub struct CatalogCache {
    built: HashMap<CatalogKey, Vec<MenuEntry>>,
}

impl CatalogCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for `key`, building it on a miss.
    pub fn get_or_build<F>(&mut self, key: CatalogKey, build: F) -> &[MenuEntry]
    where
        F: FnOnce() -> Vec<MenuEntry>,
    {
        self.built.entry(key).or_insert_with(build)
    }

    /// Drop the cached catalog for `key`, if any.
    pub fn invalidate(&mut self, key: &CatalogKey) {
        self.built.remove(key);
    }

    /// Drop every cached catalog.
    pub fn clear(&mut self) {
        self.built.clear();
    }

    /// Number of cached catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.built.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }
}

fn def(label: &str, path: Option<&str>, requires: Option<&str>) -> EntryDef {
    EntryDef {
        label: label.to_string(),
        path: path.map(String::from),
        requires: requires.map(String::from),
    }
}

/// Built-in default spec for the staff CRM portal.
#[must_use]
pub fn crm_spec() -> CatalogSpec {
    let entries = [
        ("dashboard", def("Dashboard", Some("/dashboard"), None)),
        ("bookings", def("Bookings", None, None)),
        ("calendar", def("Calendar", Some("/bookings/calendar"), None)),
        ("booking-list", def("All Bookings", Some("/bookings"), None)),
        ("clients", def("Clients", None, None)),
        ("client-list", def("Client List", Some("/clients"), None)),
        ("loyalty", def("Loyalty", Some("/clients/loyalty"), None)),
        ("staff", def("Staff", Some("/staff"), Some("manage_staff"))),
        ("messages", def("Messages", Some("/messages"), None)),
        (
            "marketing",
            def("Marketing", Some("/marketing"), Some("manage_marketing")),
        ),
        ("reports", def("Reports", Some("/reports"), Some("view_reports"))),
        ("settings", def("Settings", Some("/settings"), None)),
    ]
    .into_iter()
    .map(|(id, def)| (id.to_string(), def))
    .collect();

    let groups = [
        ("bookings", vec!["calendar", "booking-list"]),
        ("clients", vec!["client-list", "loyalty"]),
    ]
    .into_iter()
    .map(|(id, children)| {
        (
            id.to_string(),
            children.into_iter().map(String::from).collect(),
        )
    })
    .collect();

    CatalogSpec {
        entries,
        groups,
        order: [
            "dashboard",
            "bookings",
            "clients",
            "staff",
            "messages",
            "marketing",
            "reports",
            "settings",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect(),
    }
}

/// Built-in default spec for the end-client account portal.
#[must_use]
pub fn client_spec() -> CatalogSpec {
    let entries = [
        ("home", def("Home", Some("/"), None)),
        ("appointments", def("My Appointments", Some("/appointments"), None)),
        ("offers", def("Offers", Some("/offers"), None)),
        ("messages", def("Messages", Some("/messages"), None)),
        ("profile", def("Profile", Some("/profile"), None)),
    ]
    .into_iter()
    .map(|(id, def)| (id.to_string(), def))
    .collect();

    CatalogSpec {
        entries,
        groups: HashMap::new(),
        order: ["home", "appointments", "offers", "messages", "profile"]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    }
}

/// The built-in spec for a portal.
#[must_use]
pub fn default_spec(portal: PortalVariant) -> CatalogSpec {
    match portal {
        PortalVariant::Crm => crm_spec(),
        PortalVariant::Client => client_spec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_catalog_deterministic() {
        let spec = crm_spec();
        let flags = RoleFlags::all();
        let first = build_catalog(&spec, &flags);
        let second = build_catalog(&spec, &flags);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_catalog_order_matches_spec_order() {
        let catalog = build_catalog(&crm_spec(), &RoleFlags::all());
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "dashboard",
                "bookings",
                "clients",
                "staff",
                "messages",
                "marketing",
                "reports",
                "settings"
            ]
        );
    }

    #[test]
    fn test_build_catalog_groups_nest_children_in_listed_order() {
        let catalog = build_catalog(&crm_spec(), &RoleFlags::all());
        let bookings = catalog.iter().find(|e| e.id == "bookings").unwrap();
        let child_ids: Vec<_> = bookings
            .children()
            .unwrap()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(child_ids, vec!["calendar", "booking-list"]);
    }

    #[test]
    fn test_build_catalog_skips_denied_flags() {
        let catalog = build_catalog(&crm_spec(), &RoleFlags::granting(["view_reports"]));
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&"reports"));
        assert!(!ids.contains(&"staff"));
        assert!(!ids.contains(&"marketing"));
    }

    #[test]
    fn test_build_catalog_skips_ids_missing_from_lookup() {
        let mut spec = crm_spec();
        spec.order.push("not-in-lookup".to_string());
        let catalog = build_catalog(&spec, &RoleFlags::all());
        assert!(!catalog.iter().any(|e| e.id == "not-in-lookup"));
    }

    #[test]
    fn test_build_catalog_skips_missing_group_children() {
        let mut spec = crm_spec();
        spec.groups
            .get_mut("bookings")
            .unwrap()
            .push("ghost".to_string());
        let catalog = build_catalog(&spec, &RoleFlags::all());
        let bookings = catalog.iter().find(|e| e.id == "bookings").unwrap();
        assert_eq!(bookings.children().unwrap().len(), 2);
    }

    #[test]
    fn test_client_spec_has_no_groups() {
        let catalog = build_catalog(&client_spec(), &RoleFlags::all());
        assert!(catalog.iter().all(|e| !e.is_group()));
    }

    #[test]
    fn test_spec_validate_ok() {
        assert!(crm_spec().validate().is_ok());
        assert!(client_spec().validate().is_ok());
    }

    #[test]
    fn test_spec_validate_rejects_duplicate_order_ids() {
        let mut spec = crm_spec();
        spec.order.push("dashboard".to_string());
        let err = spec.validate().unwrap_err();
        assert!(err.contains("dashboard"));
    }

    #[test]
    fn test_spec_validate_rejects_duplicate_group_children() {
        let mut spec = crm_spec();
        spec.groups
            .get_mut("bookings")
            .unwrap()
            .push("calendar".to_string());
        let err = spec.validate().unwrap_err();
        assert!(err.contains("calendar"));
    }

    #[test]
    fn test_role_flags_allows() {
        let flags = RoleFlags::granting(["manage_staff"]);
        assert!(flags.allows(None));
        assert!(flags.allows(Some("manage_staff")));
        assert!(!flags.allows(Some("view_reports")));
    }

    #[test]
    fn test_catalog_cache_builds_once_per_key() {
        let mut cache = CatalogCache::new();
        let key = CatalogKey {
            portal: PortalVariant::Crm,
            role: "manager".to_string(),
            locale: "en".to_string(),
        };
        let mut builds = 0;
        for _ in 0..3 {
            cache.get_or_build(key.clone(), || {
                builds += 1;
                build_catalog(&crm_spec(), &RoleFlags::all())
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_catalog_cache_invalidate_forces_rebuild() {
        let mut cache = CatalogCache::new();
        let key = CatalogKey {
            portal: PortalVariant::Crm,
            role: "manager".to_string(),
            locale: "en".to_string(),
        };
        cache.get_or_build(key.clone(), || build_catalog(&crm_spec(), &RoleFlags::all()));
        cache.invalidate(&key);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_spec_serde_round_trip() {
        let spec = crm_spec();
        let json = serde_json::to_string(&spec).unwrap();
        let back: CatalogSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
