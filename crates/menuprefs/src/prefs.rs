//! Persisted preference wire types.
//!
//! These types mirror the shape the preferences backend stores. The backend
//! owns the wire format; this module only needs to read old payloads
//! tolerantly and write well-formed ones.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The navigation context a preference set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalVariant {
    /// The internal staff CRM portal: ordering and visibility are both
    /// customizable.
    Crm,
    /// The end-client account portal: catalog order is fixed, only
    /// visibility and recipient targeting are customizable.
    Client,
}

impl std::fmt::Display for PortalVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crm => write!(f, "crm"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// How client-portal customizations are targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Apply the customization to every recipient.
    #[default]
    All,
    /// Apply only to the recipients in `target_ids`.
    Selected,
}

/// A recipient selectable in the client-portal targeting picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Stable recipient id.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// The preference payload as stored by the backend.
///
/// Every field is optional on the wire; older payloads may predate any of
/// them. `menu_order` is kept as raw JSON values because historical payloads
/// mix plain id strings with `{"id": ...}` records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPreferences {
    /// Top-level entry ids in the operator's preferred order (CRM only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu_order: Vec<Value>,

    /// Ids of hidden entries at any depth.
    #[serde(default)]
    pub hidden_items: Vec<String>,

    /// Targeting mode (client portal only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_mode: Option<ApplyMode>,

    /// Targeted recipient ids (client portal only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_ids: Vec<String>,
}

/// Normalize a raw persisted order list into deduplicated entry ids.
///
/// Accepts plain id strings and `{"id": ...}` records; drops duplicates
/// keeping the first occurrence; drops empty, null, and malformed entries.
#[must_use]
pub fn normalize_order(raw: &[Value]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut order = Vec::new();
    for value in raw {
        let id = match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("id").and_then(Value::as_str),
            _ => None,
        };
        let Some(id) = id else { continue };
        if id.is_empty() {
            continue;
        }
        if seen.insert(id.to_string()) {
            order.push(id.to_string());
        }
    }
    order
}
