//! Streak calculation.
//!
//! Everything in this module is a pure function of its arguments. The
//! reference day is always passed in by the caller.

mod aggregate;
mod engine;

pub use aggregate::{aggregate, AggregateStreakResult, StreakResult};
pub use engine::{compute_habit_streak, HabitStreak};
