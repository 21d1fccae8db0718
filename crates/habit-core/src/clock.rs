//! Sources of "today".
//!
//! Streak calculations never read the wall clock themselves; a [`Clock`] is
//! consulted once by the caller and the resulting day is passed in.

use std::{fmt, str::FromStr};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CompletionDate;

/// Supplies the reference day for streak calculations.
pub trait Clock {
    /// The current calendar day.
    fn today(&self) -> CompletionDate;
}

/// Which timezone decides where one calendar day ends and the next begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Days roll over at midnight UTC.
    #[default]
    Utc,
    /// Days roll over at midnight in the system's local timezone.
    Local,
}

impl DayBoundary {
    /// The lowercase name of the boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utc => "utc",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayBoundary {
    type Err = UnknownDayBoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(UnknownDayBoundaryError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognised day boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day boundary '{0}', expected 'utc' or 'local'")]
pub struct UnknownDayBoundaryError(String);

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    boundary: DayBoundary,
}

impl SystemClock {
    /// A clock whose days roll over at `boundary`.
    #[must_use]
    pub const fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> CompletionDate {
        match self.boundary {
            DayBoundary::Utc => CompletionDate::from_datetime(&Utc::now()),
            DayBoundary::Local => CompletionDate::from_datetime(&Local::now()),
        }
    }
}

/// A clock that is stuck on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub CompletionDate);

impl Clock for FixedClock {
    fn today(&self) -> CompletionDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CompletionDate {
        (**self).today()
    }
}
