//! `menuprefs` - CLI for the salon CRM menu customization core
//!
//! This binary inspects portal navigation catalogs and reads or resets the
//! operator preferences stored by the backend.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use menuprefs::api::{HttpPreferencesApi, PreferencesApi};
use menuprefs::catalog::{build_catalog, RoleFlags};
use menuprefs::cli::{CatalogCommand, Cli, Command, ConfigCommand, PreferencesCommand};
use menuprefs::entry::MenuEntry;
use menuprefs::prefs::{PortalVariant, StoredPreferences};
use menuprefs::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Catalog(catalog_cmd) => handle_catalog(&config, &catalog_cmd),
        Command::Preferences(prefs_cmd) => handle_preferences(&config, prefs_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_catalog(config: &Config, cmd: &CatalogCommand) -> anyhow::Result<()> {
    match cmd {
        CatalogCommand::Show { portal, grant, json } => {
            let portal = PortalVariant::from(*portal);
            let flags = if grant.is_empty() {
                RoleFlags::all()
            } else {
                RoleFlags::granting(grant.iter().cloned())
            };
            let catalog = build_catalog(&config.catalog_spec(portal), &flags);

            if *json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                println!("Default catalog for portal '{portal}'");
                println!("--------------------------------");
                print_tree(&catalog, 0);
            }
        }
    }
    Ok(())
}

fn print_tree(entries: &[MenuEntry], depth: usize) {
    for entry in entries {
        let indent = "  ".repeat(depth);
        match entry.children() {
            Some(children) => {
                println!("{indent}{} ({})", entry.label, entry.id);
                print_tree(children, depth + 1);
            }
            None => {
                let path = entry
                    .path()
                    .map(|p| format!("  -> {p}"))
                    .unwrap_or_default();
                println!("{indent}{} ({}){path}", entry.label, entry.id);
            }
        }
    }
}

async fn handle_preferences(config: &Config, cmd: PreferencesCommand) -> anyhow::Result<()> {
    let api = HttpPreferencesApi::new(config.api.base_url.clone(), config.api_timeout())?;

    match cmd {
        PreferencesCommand::Show { portal, json } => {
            let portal = PortalVariant::from(portal);
            let prefs = api.fetch(portal).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            } else {
                println!("Stored preferences for portal '{portal}'");
                println!("  Menu order:   {:?}", menuprefs::prefs::normalize_order(&prefs.menu_order));
                println!("  Hidden items: {:?}", prefs.hidden_items);
                if let Some(mode) = prefs.apply_mode {
                    println!("  Apply mode:   {mode:?}");
                    println!("  Target ids:   {:?}", prefs.target_ids);
                }
            }
        }
        PreferencesCommand::Reset { portal, yes } => {
            if !yes {
                println!("This will discard all stored menu customization.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let portal = PortalVariant::from(portal);
            api.save(portal, &StoredPreferences::default()).await?;
            println!("Preferences for portal '{portal}' reset to defaults.");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Api]");
                println!("  Base URL:     {}", config.api.base_url);
                println!("  Timeout (ms): {}", config.api.timeout_ms);
                println!();
                println!("[Autosave]");
                println!("  Debounce (ms): {}", config.autosave.debounce_ms);
                println!();
                println!("[Catalog]");
                println!("  CRM override:    {}", config.catalog.crm.is_some());
                println!("  Client override: {}", config.catalog.client.is_some());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
