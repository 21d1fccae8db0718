use std::path::Path;

use habit_core::{storage::config_path, Config, DayBoundary, Frequency};
use tracing::instrument;

use crate::cli::terminal::Colorize;

const KEYS: [&str; 3] = ["day_boundary", "default_frequency", "allow_unrecognised"];

#[derive(Debug, clap::Parser)]
/// Show or modify habit store configuration
///
/// Configuration is stored in .habits/config.toml under the store root.
///
/// Available configuration keys:
///   `day_boundary`        When "today" rolls over: utc (default) or local
///   `default_frequency`   Frequency of new habits: daily (default), weekly,
///                         monthly
///   `allow_unrecognised`  Skip markdown files that are not habits (default:
///                         false)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        key: String,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   habit config set `day_boundary` local
    ///   habit config set `default_frequency` weekly
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let path = config_path(root);

        match self.command {
            ConfigCommand::Show => {
                let config = load(&path)?;
                println!("Configuration:");
                for key in KEYS {
                    println!("  {key}: {}", get(&config, key)?);
                }
                if !path.exists() {
                    println!("{}", "(defaults, no config file found)".dim());
                }
            }
            ConfigCommand::Get { key } => println!("{}", get(&load(&path)?, &key)?),
            ConfigCommand::Set { key, value } => {
                let mut config = load(&path)?;
                set(&mut config, &key, &value)?;
                config.save(&path).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!(
                    "{}",
                    format!("✅ Set {key} = {}", get(&config, &key)?).success()
                );
            }
        }
        Ok(())
    }
}

fn load(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        Ok(Config::default())
    }
}

fn get(config: &Config, key: &str) -> anyhow::Result<String> {
    Ok(match key {
        "day_boundary" => config.day_boundary.to_string(),
        "default_frequency" => config.default_frequency.to_string(),
        "allow_unrecognised" => config.allow_unrecognised.to_string(),
        _ => return Err(unknown_key(key)),
    })
}

fn set(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "day_boundary" => config.day_boundary = value.parse::<DayBoundary>()?,
        "default_frequency" => config.default_frequency = value.parse::<Frequency>()?,
        "allow_unrecognised" => {
            config.allow_unrecognised = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown configuration key: '{key}'\n\nAvailable keys:\n  {}",
        KEYS.join("\n  ")
    )
}
