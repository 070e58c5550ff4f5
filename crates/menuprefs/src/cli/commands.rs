//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::prefs::PortalVariant;

/// Catalog inspection commands.
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Show the default catalog for a portal
    Show {
        /// Portal to build the catalog for
        #[arg(short, long, value_enum, default_value = "crm")]
        portal: PortalArg,

        /// Permission flags to grant (defaults to all)
        #[arg(short, long)]
        grant: Vec<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Stored-preference commands.
#[derive(Debug, Subcommand)]
pub enum PreferencesCommand {
    /// Fetch and show the stored preferences for a portal
    Show {
        /// Portal to fetch preferences for
        #[arg(short, long, value_enum, default_value = "crm")]
        portal: PortalArg,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Persist an empty preference set, restoring the default menu
    Reset {
        /// Portal to reset
        #[arg(short, long, value_enum, default_value = "crm")]
        portal: PortalArg,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Portal argument for selecting a navigation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PortalArg {
    /// The internal staff CRM portal
    #[default]
    Crm,
    /// The end-client account portal
    Client,
}

impl From<PortalArg> for PortalVariant {
    fn from(arg: PortalArg) -> Self {
        match arg {
            PortalArg::Crm => Self::Crm,
            PortalArg::Client => Self::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_arg_conversion() {
        assert_eq!(PortalVariant::from(PortalArg::Crm), PortalVariant::Crm);
        assert_eq!(PortalVariant::from(PortalArg::Client), PortalVariant::Client);
    }

    #[test]
    fn test_portal_arg_default() {
        assert_eq!(PortalArg::default(), PortalArg::Crm);
    }

    #[test]
    fn test_catalog_command_debug() {
        let cmd = CatalogCommand::Show {
            portal: PortalArg::Crm,
            grant: Vec::new(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_preferences_command_debug() {
        let cmd = PreferencesCommand::Reset {
            portal: PortalArg::Client,
            yes: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Reset"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
