use dialoguer::Confirm;
use tracing::instrument;

use crate::cli::{terminal::Colorize, Context};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The habit to delete: its name, id, or an id prefix
    habit: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut directory = context.open()?;
        let habit = directory.find(&self.habit)?;
        let id = habit.id();

        if !self.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete '{}' and its {} recorded completion(s)?",
                    habit.name(),
                    habit.completions().len()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        let deleted = directory.delete_habit(id)?;

        println!(
            "{}",
            format!("🗑️  Deleted habit {}", deleted.name()).success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use habit_core::{Directory, HabitName};
    use tempfile::tempdir;

    use super::Command;
    use crate::cli::Context;

    #[test]
    fn delete_removes_habit_and_file() {
        let tmp = tempdir().unwrap();
        let mut directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        let keep = directory
            .create_habit(HabitName::new("Read").unwrap(), None, None)
            .unwrap();
        let gone = directory
            .create_habit(HabitName::new("Run").unwrap(), None, None)
            .unwrap();
        let context = Context::new(tmp.path().to_path_buf(), None);

        Command {
            habit: "run".to_string(),
            yes: true,
        }
        .run(&context)
        .unwrap();

        assert!(!tmp.path().join(format!("{}.md", gone.id())).exists());
        let directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(directory.habits().len(), 1);
        assert_eq!(directory.habits()[0].id(), keep.id());
    }

    #[test]
    fn delete_unknown_habit_fails() {
        let tmp = tempdir().unwrap();
        let context = Context::new(tmp.path().to_path_buf(), None);

        let result = Command {
            habit: "Read".to_string(),
            yes: true,
        }
        .run(&context);

        assert!(result.is_err());
    }
}
