use habit_core::{streak::StreakResult, HabitRecord};
use serde_json::{json, Value};
use tracing::instrument;

use crate::cli::{
    terminal::{is_narrow, streak_label, truncate, Colorize},
    Context, OutputFormat,
};

#[derive(Debug, clap::Parser)]
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

        let rows: Vec<_> = directory
            .habits()
            .iter()
            .map(|habit| (habit, StreakResult::for_habit(habit, today)))
            .collect();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&rows))?),
            OutputFormat::Table => output_table(&rows),
        }
        Ok(())
    }
}

fn to_json(rows: &[(&HabitRecord, StreakResult)]) -> Value {
    rows.iter()
        .map(|(habit, streak)| {
            json!({
                "id": habit.id(),
                "name": habit.name().as_str(),
                "description": habit.description(),
                "frequency": habit.frequency(),
                "created": habit.created().to_rfc3339(),
                "completions": habit.completions().len(),
                "current_streak": streak.current_streak,
                "longest_streak": streak.longest_streak,
            })
        })
        .collect()
}

fn output_table(rows: &[(&HabitRecord, StreakResult)]) {
    if rows.is_empty() {
        println!("No habits yet. Create one with 'habit create'.");
        return;
    }

    if is_narrow() {
        for (habit, streak) in rows {
            println!("{} {}", habit.name(), habit.id().short().dim());
            println!(
                "  current {} · longest {}",
                streak_label(streak.current_streak),
                streak.longest_streak
            );
        }
        return;
    }

    println!(
        "{:<10} {:<24} {:<8} {:>8} {:>8}",
        "ID", "Name", "Every", "Current", "Longest"
    );
    println!("{}", "─".repeat(62).dim());
    for (habit, streak) in rows {
        println!(
            "{:<10} {:<24} {:<8} {:>8} {:>8}",
            habit.id().short(),
            truncate(habit.name(), 24),
            habit.frequency().as_str(),
            streak.current_streak,
            streak.longest_streak
        );
    }
}
