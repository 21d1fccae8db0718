use habit_core::{streak::StreakResult, CompletionDate};
use tracing::instrument;

use crate::cli::{
    terminal::{streak_label, Colorize},
    Context,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The habit to mark complete: its name, id, or an id prefix
    habit: String,

    /// The day the habit was completed (YYYY-MM-DD). Defaults to today.
    #[clap(long, short)]
    date: Option<CompletionDate>,
}

impl Command {
    #[instrument]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let mut directory = context.open()?;
        let today = context.clock(directory.config()).today();
        let date = self.date.unwrap_or(today);

        let id = directory.find(&self.habit)?.id();
        let recorded = directory.mark_complete(id, date, today)?;

        let Some(habit) = directory.get(id) else {
            anyhow::bail!("habit {id} disappeared while updating");
        };

        if recorded {
            let streak = StreakResult::for_habit(habit, today);
            println!(
                "{} {} on {date} (current streak: {})",
                "✅ Completed".success(),
                habit.name(),
                streak_label(streak.current_streak)
            );
        } else {
            println!(
                "{}",
                format!("{} was already completed on {date}", habit.name()).dim()
            );
        }
        Ok(())
    }
}
