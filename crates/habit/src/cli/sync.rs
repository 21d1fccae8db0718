use tracing::instrument;

use crate::cli::{terminal::Colorize, Context};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Suppress output
    #[arg(long, short)]
    quiet: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let directory = context.open()?;

        let saved = directory.save_all()?;

        if !self.quiet {
            println!("{}", format!("✅ Rewrote {saved} habit files").success());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use habit_core::{Directory, HabitName};
    use tempfile::tempdir;

    use super::Command;
    use crate::cli::Context;

    #[test]
    fn sync_normalizes_hand_edited_files() {
        let tmp = tempdir().unwrap();
        let mut directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        let habit = directory
            .create_habit(HabitName::new("Read").unwrap(), None, None)
            .unwrap();
        let path = tmp.path().join(format!("{}.md", habit.id()));

        let content = fs::read_to_string(&path).unwrap();
        let edited = content.replace("# Read", "#   Read  \n\n\n");
        fs::write(&path, &edited).unwrap();

        let context = Context::new(tmp.path().to_path_buf(), None);
        Command { quiet: true }.run(&context).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}
