use habit_core::streak::{AggregateStreakResult, StreakResult};
use serde_json::Value;
use tracing::instrument;

use crate::cli::{
    terminal::{is_narrow, streak_label, truncate, Colorize},
    Context, OutputFormat,
};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let directory = context.open()?;
        let today = context.clock(directory.config()).today();
        let stats = directory.snapshot(today);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&stats)?)?),
            OutputFormat::Table => output_table(&stats),
        }
        Ok(())
    }
}

fn to_json(stats: &AggregateStreakResult) -> serde_json::Result<Value> {
    serde_json::to_value(stats)
}

fn output_table(stats: &AggregateStreakResult) {
    if stats.individual_habit_streaks.is_empty() {
        println!("No habits found yet. Create one with 'habit create'.");
        return;
    }

    println!("Streaks");
    println!("{}", "───────".dim());
    println!(
        "Total current streak: {}",
        streak_label(stats.total_current_streak)
    );
    println!("Best streak ever:     {}", stats.total_longest_streak);
    if let Some(most) = &stats.most_streak_habit {
        println!("On fire:              {}", describe(most));
    }
    if let Some(least) = &stats.least_streak_habit {
        println!("Needs attention:      {}", describe(least).warning());
    }
    println!();

    let narrow = is_narrow();
    if !narrow {
        println!("{:<24} {:>8} {:>8}", "Habit", "Current", "Longest");
    }
    for streak in &stats.individual_habit_streaks {
        if narrow {
            println!(
                "{}: {} / {}",
                streak.habit_name, streak.current_streak, streak.longest_streak
            );
        } else {
            println!(
                "{:<24} {:>8} {:>8}",
                truncate(&streak.habit_name, 24),
                streak.current_streak,
                streak.longest_streak
            );
        }
    }
}

fn describe(streak: &StreakResult) -> String {
    format!("{} ({})", streak.habit_name, streak.current_streak)
}

#[cfg(test)]
mod tests {
    use habit_core::{CompletionDate, Directory, HabitName};
    use tempfile::tempdir;
    use test_case::test_case;

    use super::{to_json, Command};
    use crate::cli::{Context, OutputFormat};

    #[test_case(OutputFormat::Table; "table")]
    #[test_case(OutputFormat::Json; "json")]
    fn stats_runs(output: OutputFormat) {
        let tmp = tempdir().unwrap();
        let today: CompletionDate = "2025-07-14".parse().unwrap();
        let mut directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        for name in ["Read", "Run"] {
            let habit = directory
                .create_habit(HabitName::new(name).unwrap(), None, None)
                .unwrap();
            directory
                .mark_complete(habit.id(), today.pred().unwrap(), today)
                .unwrap();
        }
        let context = Context::new(tmp.path().to_path_buf(), Some(today));

        Command { output }.run(&context).unwrap();
    }

    #[test]
    fn stats_is_the_default_command() {
        let tmp = tempdir().unwrap();
        let context = Context::new(tmp.path().to_path_buf(), None);

        Command::default().run(&context).unwrap();
    }

    #[test]
    fn json_carries_the_roll_up() {
        let tmp = tempdir().unwrap();
        let today: CompletionDate = "2025-07-14".parse().unwrap();
        let mut directory = Directory::open(tmp.path().to_path_buf()).unwrap();
        let read = directory
            .create_habit(HabitName::new("Read").unwrap(), None, None)
            .unwrap();
        directory
            .create_habit(HabitName::new("Run").unwrap(), None, None)
            .unwrap();
        directory
            .mark_complete(read.id(), today.pred().unwrap(), today)
            .unwrap();
        directory.mark_complete(read.id(), today, today).unwrap();

        let json = to_json(&directory.snapshot(today)).unwrap();

        assert_eq!(json["total_current_streak"], 2);
        assert_eq!(json["total_longest_streak"], 2);
        assert_eq!(json["most_streak_habit"]["habit_name"], "Read");
        assert_eq!(json["most_streak_habit"]["habit_id"], read.id().to_string());
        assert_eq!(json["least_streak_habit"]["habit_name"], "Run");
        assert_eq!(json["least_streak_habit"]["current_streak"], 0);

        let names: Vec<_> = json["individual_habit_streaks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|streak| streak["habit_name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Read") && names.contains(&"Run"));
    }

    #[test]
    fn json_of_an_empty_store() {
        let tmp = tempdir().unwrap();
        let directory = Directory::open(tmp.path().to_path_buf()).unwrap();

        let json = to_json(&directory.snapshot("2025-07-14".parse().unwrap())).unwrap();

        assert_eq!(json["total_current_streak"], 0);
        assert!(json["most_streak_habit"].is_null());
        assert_eq!(json["individual_habit_streaks"].as_array().unwrap().len(), 0);
    }
}
