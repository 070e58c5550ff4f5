//! `menuprefs` - Navigation menu customization core for a salon CRM
//!
//! This library provides the menu-customization logic shared by the CRM's
//! portals: building role-specific navigation catalogs, reconciling
//! server-stored operator preferences onto them, pure tree mutation
//! operations for the drag-and-drop editor, and a debounced autosave
//! scheduler persisting changes through the preferences backend.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod autosave;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod editor;
pub mod entry;
pub mod error;
pub mod logging;
pub mod ops;
pub mod prefs;
pub mod reconcile;
pub mod snapshot;

pub use api::{ApiError, PreferencesApi};
pub use autosave::{AutosaveScheduler, SaveState};
pub use catalog::{build_catalog, CatalogCache, CatalogSpec, RoleFlags};
pub use config::Config;
pub use editor::{MenuChanged, MenuPreferenceEditor};
pub use entry::{EntryKind, MenuEntry};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use prefs::{ApplyMode, PortalVariant, StoredPreferences};
pub use snapshot::SaveSnapshot;
