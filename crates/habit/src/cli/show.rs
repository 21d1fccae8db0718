use habit_core::{streak::StreakResult, CompletionDate, HabitRecord};
use tracing::instrument;

use crate::cli::{
    terminal::{streak_label, Colorize},
    Context,
};

/// Number of days shown in the recent-activity strip.
const RECENT_DAYS: usize = 14;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The habit to show: its name, id, or an id prefix
    habit: String,
}

impl Command {
    #[instrument]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let directory = context.open()?;
        let today = context.clock(directory.config()).today();
        let habit = directory.find(&self.habit)?;
        let streak = StreakResult::for_habit(habit, today);

        println!("{}", habit.name().as_str().info());
        if let Some(description) = habit.description() {
            println!("{}", description.dim());
        }
        println!();
        println!("  ID:          {}", habit.id());
        println!("  Frequency:   {}", habit.frequency());
        println!("  Created:     {}", habit.created().format("%Y-%m-%d"));
        println!("  Completions: {}", habit.completions().len());
        if let Some(last) = habit.completions().last() {
            println!("  Last done:   {last}");
        }
        println!();
        println!("  Current streak: {}", streak_label(streak.current_streak));
        println!("  Longest streak: {}", streak.longest_streak);
        println!();
        println!("  {} {}", recent_activity(habit, today), "(last 14 days)".dim());
        Ok(())
    }
}

/// Render the last [`RECENT_DAYS`] days ending `today`, oldest first.
fn recent_activity(habit: &HabitRecord, today: CompletionDate) -> String {
    let mut days: Vec<CompletionDate> =
        std::iter::successors(Some(today), |day| day.pred())
            .take(RECENT_DAYS)
            .collect();
    days.reverse();

    days.into_iter()
        .map(|day| if habit.is_completed_on(day) { '■' } else { '·' })
        .collect()
}

#[cfg(test)]
mod tests {
    use habit_core::{CompletionDate, Directory, Frequency, HabitName, HabitRecord};
    use tempfile::tempdir;

    use super::{recent_activity, Command};
    use crate::cli::Context;

    fn date(s: &str) -> CompletionDate {
        s.parse().unwrap()
    }

    #[test]
    fn recent_activity_marks_completed_days() {
        let habit = HabitRecord::new(HabitName::new("Read").unwrap(), None, Frequency::Daily)
            .with_completions([date("2025-07-14"), date("2025-07-12"), date("2025-06-01")]);

        let strip = recent_activity(&habit, date("2025-07-14"));

        assert_eq!(strip, "···········■·■");
    }

    #[test]
    fn show_runs() {
        let tmp = tempdir().unwrap();
        let mut directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        directory
            .create_habit(
                HabitName::new("Read").unwrap(),
                Some("Twenty pages".to_string()),
                None,
            )
            .unwrap();
        let context = Context::new(tmp.path().to_path_buf(), Some(date("2025-07-14")));

        Command {
            habit: "read".to_string(),
        }
        .run(&context)
        .unwrap();
    }
}
