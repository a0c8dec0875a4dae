//! Configuration management CLI commands.
//!
//! `config get`, `config set`, `config list` and `config path` read and edit
//! `config.ini` without opening it by hand.

use clap::Subcommand;
use trajtok::config::{config_file_path, ConfigError, ConfigFile, ConfigKey};

use crate::error::CliError;

/// `trajtok config` actions.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting name, e.g. tokenizer.resolution
        key: String,
    },

    /// Validate and store one setting
    Set {
        /// Setting name, e.g. detokenizer.clusters
        key: String,

        /// New value; an empty string clears an artifact path
        value: String,
    },

    /// Print every setting with its current value
    List,

    /// Print where config.ini lives
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = parse_key(&key)?;
            println!("{}", display_value(&key.get(&ConfigFile::load()?)));
        }
        ConfigCommands::Set { key, value } => {
            let key = parse_key(&key)?;
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)?;
            config.save()?;
            println!("{} = {}", key.name(), display_value(&key.get(&config)));
        }
        ConfigCommands::List => print!("{}", render_settings(&ConfigFile::load()?)),
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|e: ConfigError| {
        CliError::Config(format!(
            "{}. Run 'trajtok config list' for the available keys.",
            e
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Every key as `section.key = value`, names padded to a common width.
fn render_settings(config: &ConfigFile) -> String {
    let width = ConfigKey::all()
        .iter()
        .map(|key| key.name().len())
        .max()
        .unwrap_or(0);

    ConfigKey::all()
        .iter()
        .map(|key| {
            format!(
                "{:width$} = {}\n",
                key.name(),
                display_value(&key.get(config)),
                width = width
            )
        })
        .collect()
}
