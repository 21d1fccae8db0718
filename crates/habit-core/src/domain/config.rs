use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{clock::DayBoundary, domain::Frequency};

/// Configuration for a habit store.
///
/// Stored as TOML in `.habits/config.toml` under the store root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Where one calendar day ends and the next begins when reading the
    /// system clock.
    pub day_boundary: DayBoundary,

    /// Frequency given to new habits when none is specified.
    pub default_frequency: Frequency,

    /// Whether to skip markdown files in the store that cannot be parsed as
    /// habits, rather than failing to load.
    pub allow_unrecognised: bool,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Parent directories are created if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to write config file: {e}"))?;
        }
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Loads the configuration at `path`, falling back to the defaults if the
    /// file is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        day_boundary: DayBoundary,

        #[serde(default)]
        default_frequency: Frequency,

        #[serde(default)]
        allow_unrecognised: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                day_boundary,
                default_frequency,
                allow_unrecognised,
            } => Self {
                day_boundary,
                default_frequency,
                allow_unrecognised,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            day_boundary: config.day_boundary,
            default_frequency: config.default_frequency,
            allow_unrecognised: config.allow_unrecognised,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nday_boundary = \"local\"\ndefault_frequency = \"weekly\"\nallow_unrecognised = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert_eq!(config.default_frequency, Frequency::Weekly);
        assert!(config.allow_unrecognised);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nday_boundary = \"mars\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".habits").join("config.toml");
        let config = Config {
            day_boundary: DayBoundary::Local,
            default_frequency: Frequency::Monthly,
            allow_unrecognised: true,
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join("config.toml"));
        assert_eq!(config, Config::default());
    }
}
