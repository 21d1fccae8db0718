use std::{collections::BTreeSet, fmt, ops::Deref, str::FromStr};

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::CompletionDate;

/// Globally unique, perpetually stable identifier of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The first eight hex digits, for compact display.
    #[must_use]
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(8);
        s
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for HabitId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for HabitId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The display name of a habit.
///
/// Names are trimmed of surrounding whitespace, are never empty, and fit on one
/// line (no control characters).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HabitName(NonEmptyString);

impl HabitName {
    /// Create a habit name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNameError`] if the name is empty or only whitespace,
    /// or if it contains a line break or other control character.
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidNameError> {
        let name = name.as_ref().trim();
        if name.chars().any(char::is_control) {
            return Err(InvalidNameError::ControlCharacter);
        }
        NonEmptyString::new(name.to_string())
            .map(Self)
            .map_err(|_| InvalidNameError::Empty)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for HabitName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for HabitName {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for HabitName {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Deref for HabitName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for HabitName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HabitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a valid habit name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidNameError {
    /// Nothing but whitespace.
    #[error("habit name cannot be empty")]
    Empty,
    /// A line break, tab or other control character.
    #[error("habit name must be a single line without control characters")]
    ControlCharacter,
}

/// How often a habit is intended to be performed.
///
/// This is informational only. Streaks are always counted in consecutive
/// calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    #[default]
    Daily,
    /// Once a week.
    Weekly,
    /// Once a month.
    Monthly,
}

impl Frequency {
    /// All frequencies, in display order.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// The lowercase name of the frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = UnknownFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == normalized)
            .ok_or_else(|| UnknownFrequencyError(s.to_string()))
    }
}

/// Error returned when parsing an unrecognised frequency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown frequency '{0}', expected one of: daily, weekly, monthly")]
pub struct UnknownFrequencyError(String);

/// A habit and its completion history.
///
/// Completions are a set: at most one entry per calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRecord {
    pub(crate) id: HabitId,
    pub(crate) name: HabitName,
    pub(crate) description: Option<String>,
    pub(crate) frequency: Frequency,
    pub(crate) created: DateTime<Utc>,
    pub(crate) completions: BTreeSet<CompletionDate>,
}

impl HabitRecord {
    /// Create a new habit with no completions.
    ///
    /// A fresh identifier is generated and the creation time is set to now.
    /// A blank description is stored as `None`.
    #[must_use]
    pub fn new(name: HabitName, description: Option<String>, frequency: Frequency) -> Self {
        Self::with_id(HabitId::new_v4(), name, description, frequency, Utc::now())
    }

    /// Create a habit with an explicit identity and creation time.
    #[must_use]
    pub fn with_id(
        id: HabitId,
        name: HabitName,
        description: Option<String>,
        frequency: Frequency,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description: normalize_description(description),
            frequency,
            created,
            completions: BTreeSet::new(),
        }
    }

    /// Replace the completion history, returning the updated record.
    #[must_use]
    pub fn with_completions(mut self, completions: impl IntoIterator<Item = CompletionDate>) -> Self {
        self.completions = completions.into_iter().collect();
        self
    }

    /// The habit's identifier.
    #[must_use]
    pub const fn id(&self) -> HabitId {
        self.id
    }

    /// The habit's display name.
    #[must_use]
    pub const fn name(&self) -> &HabitName {
        &self.name
    }

    /// The optional free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The intended frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// When the habit was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Days on which the habit was completed, in ascending order.
    #[must_use]
    pub const fn completions(&self) -> &BTreeSet<CompletionDate> {
        &self.completions
    }

    /// Whether the habit was completed on `date`.
    #[must_use]
    pub fn is_completed_on(&self, date: CompletionDate) -> bool {
        self.completions.contains(&date)
    }

    /// Record a completion on `date`.
    ///
    /// Returns `true` if the date was newly recorded, or `false` if the habit
    /// was already completed that day.
    pub fn mark_complete(&mut self, date: CompletionDate) -> bool {
        self.completions.insert(date)
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn name(s: &str) -> HabitName {
        HabitName::new(s).unwrap()
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\t\n"; "other whitespace")]
    fn blank_names_are_rejected(input: &str) {
        assert_eq!(HabitName::new(input), Err(InvalidNameError::Empty));
    }

    #[test_case("Read\n\nbooks"; "blank line")]
    #[test_case("Read\r\nbooks"; "crlf")]
    #[test_case("Read\tbooks"; "tab")]
    #[test_case("Read\u{7f}"; "delete")]
    fn multi_line_names_are_rejected(input: &str) {
        assert_eq!(
            HabitName::new(input),
            Err(InvalidNameError::ControlCharacter)
        );
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(name("  Drink water ").as_str(), "Drink water");
    }

    #[test_case("daily", Frequency::Daily)]
    #[test_case("Weekly", Frequency::Weekly)]
    #[test_case(" MONTHLY ", Frequency::Monthly)]
    fn frequency_parses_case_insensitively(input: &str, expected: Frequency) {
        assert_eq!(input.parse::<Frequency>().unwrap(), expected);
    }

    #[test]
    fn unknown_frequency_is_an_error() {
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn blank_description_is_none() {
        let habit = HabitRecord::new(name("Read"), Some("  ".to_string()), Frequency::Daily);
        assert_eq!(habit.description(), None);

        let habit = HabitRecord::new(name("Read"), Some(" a book ".to_string()), Frequency::Daily);
        assert_eq!(habit.description(), Some("a book"));
    }

    #[test]
    fn new_habit_has_no_completions() {
        let habit = HabitRecord::new(name("Read"), None, Frequency::Weekly);
        assert!(habit.completions().is_empty());
        assert_eq!(habit.frequency(), Frequency::Weekly);
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut habit = HabitRecord::new(name("Read"), None, Frequency::Daily);
        let day = CompletionDate::new(2025, 7, 14).unwrap();

        assert!(habit.mark_complete(day));
        assert!(!habit.mark_complete(day));
        assert_eq!(habit.completions().len(), 1);
        assert!(habit.is_completed_on(day));
    }

    #[test]
    fn short_id_is_eight_hex_digits() {
        let id: HabitId = "12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53".parse().unwrap();
        assert_eq!(id.short(), "12b3f5c5");
        assert_eq!(id.to_string(), "12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53");
    }
}
