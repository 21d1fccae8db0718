//! Domain models for habit tracking.
//!
//! This module contains the core domain types: calendar dates, habit records
//! and store configuration.

/// Calendar dates at day granularity.
pub mod calendar;
pub use calendar::{CompletionDate, ParseDateError};

mod config;
pub use config::Config;

/// Habit records and their identifying types.
pub mod habit;
pub use habit::{
    Frequency, HabitId, HabitName, HabitRecord, InvalidNameError, UnknownFrequencyError,
};
