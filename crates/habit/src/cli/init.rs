use std::path::Path;

use habit_core::{storage::config_path, Config};
use tracing::instrument;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let path = config_path(root);
        if path.exists() {
            anyhow::bail!(
                "Habits directory already initialized (found existing {})",
                path.display()
            );
        }

        Config::default()
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized habits directory in {}", root.display());
        println!("  Created: .habits/config.toml");
        println!();
        println!("Next steps:");
        println!("  habit create \"Drink water\"");
        println!("  habit done \"Drink water\"");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn init_creates_config() {
        let tmp = tempdir().unwrap();

        Command::default().run(tmp.path()).unwrap();

        let config = Config::load(&config_path(tmp.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn init_twice_fails() {
        let tmp = tempdir().unwrap();

        Command::default().run(tmp.path()).unwrap();

        assert!(Command::default().run(tmp.path()).is_err());
    }
}
