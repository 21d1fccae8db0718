use habit_core::{Frequency, HabitName};
use tracing::instrument;

use crate::cli::{terminal::Colorize, Context};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The name of the habit (e.g. "Drink water")
    name: String,

    /// A longer description of the habit
    #[clap(long, short)]
    description: Option<String>,

    /// How often the habit should be done (daily, weekly, monthly)
    ///
    /// Defaults to the `default_frequency` configuration setting.
    #[clap(long, short)]
    frequency: Option<Frequency>,
}

impl Command {
    #[instrument]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let name = HabitName::new(&self.name)?;
        let mut directory = context.open()?;

        let habit = directory.create_habit(name, self.description, self.frequency)?;

        println!(
            "{} {} ({}, {})",
            "Created habit".success(),
            habit.name(),
            habit.frequency(),
            habit.id().short().dim()
        );
        Ok(())
    }
}
