//! Plain-text habit tracking
//!
//! Habits are markdown documents stored in a directory. Each records the days
//! it was completed, from which current and longest streaks are derived.

pub mod clock;
pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};

pub mod domain;
pub use domain::{CompletionDate, Config, Frequency, HabitId, HabitName, HabitRecord};

/// Filesystem storage and directory management for habits.
pub mod storage;
pub use storage::Directory;

pub mod streak;
pub use streak::{
    aggregate, compute_habit_streak, AggregateStreakResult, HabitStreak, StreakResult,
};
