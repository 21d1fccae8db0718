use serde::Serialize;

use crate::{
    domain::{CompletionDate, HabitId, HabitRecord},
    streak::compute_habit_streak,
};

/// Streak metrics for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakResult {
    /// The habit the metrics belong to.
    pub habit_id: HabitId,
    /// Copy of the habit's name, for display.
    pub habit_name: String,
    /// Consecutive completed days ending today or yesterday.
    pub current_streak: usize,
    /// Longest run of consecutive completed days in the habit's history.
    pub longest_streak: usize,
}

impl StreakResult {
    /// Compute the streak metrics of `habit` relative to `today`.
    #[must_use]
    pub fn for_habit(habit: &HabitRecord, today: CompletionDate) -> Self {
        let streak = compute_habit_streak(habit.completions().iter().copied(), today);
        Self {
            habit_id: habit.id(),
            habit_name: habit.name().to_string(),
            current_streak: streak.current,
            longest_streak: streak.longest,
        }
    }
}

/// Streak metrics rolled up across a collection of habits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStreakResult {
    /// Sum of every habit's current streak.
    pub total_current_streak: usize,
    /// The greatest longest streak of any habit.
    pub total_longest_streak: usize,
    /// The habit with the greatest current streak (first wins ties).
    pub most_streak_habit: Option<StreakResult>,
    /// The habit with the smallest current streak (first wins ties).
    pub least_streak_habit: Option<StreakResult>,
    /// Per-habit metrics, in input order.
    pub individual_habit_streaks: Vec<StreakResult>,
}

/// Roll up the streak metrics of `habits` relative to `today`.
///
/// The order of `habits` is preserved in
/// [`AggregateStreakResult::individual_habit_streaks`] and decides ties: when
/// several habits share the greatest (or smallest) current streak, the first
/// one encountered is selected.
#[must_use]
pub fn aggregate<'a, I>(habits: I, today: CompletionDate) -> AggregateStreakResult
where
    I: IntoIterator<Item = &'a HabitRecord>,
{
    let individual: Vec<StreakResult> = habits
        .into_iter()
        .map(|habit| StreakResult::for_habit(habit, today))
        .collect();

    tracing::trace!(habits = individual.len(), %today, "aggregated streaks");

    AggregateStreakResult {
        total_current_streak: individual.iter().map(|s| s.current_streak).sum(),
        total_longest_streak: individual
            .iter()
            .map(|s| s.longest_streak)
            .max()
            .unwrap_or(0),
        most_streak_habit: first_by(&individual, |candidate, best| candidate > best),
        least_streak_habit: first_by(&individual, |candidate, best| candidate < best),
        individual_habit_streaks: individual,
    }
}

/// Select the first result whose current streak beats every earlier one.
///
/// A later entry only replaces the selection when `beats` holds strictly, so
/// ties go to the earliest entry.
fn first_by(results: &[StreakResult], beats: impl Fn(usize, usize) -> bool) -> Option<StreakResult> {
    results
        .iter()
        .reduce(|best, candidate| {
            if beats(candidate.current_streak, best.current_streak) {
                candidate
            } else {
                best
            }
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{Frequency, HabitName};

    fn today() -> CompletionDate {
        "2025-07-14".parse().unwrap()
    }

    fn ago(offset: u32) -> CompletionDate {
        (0..offset).fold(today(), |day, _| day.pred().unwrap())
    }

    fn habit(name: &str, offsets: &[u32]) -> HabitRecord {
        HabitRecord::with_id(
            HabitId::new_v4(),
            HabitName::new(name).unwrap(),
            None,
            Frequency::Daily,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_completions(offsets.iter().map(|&o| ago(o)))
    }

    #[test]
    fn empty_collection() {
        let habits: [HabitRecord; 0] = [];
        let result = aggregate(&habits, today());

        assert_eq!(result.total_current_streak, 0);
        assert_eq!(result.total_longest_streak, 0);
        assert!(result.most_streak_habit.is_none());
        assert!(result.least_streak_habit.is_none());
        assert!(result.individual_habit_streaks.is_empty());
    }

    #[test]
    fn totals_sum_current_and_max_longest() {
        let habits = [
            habit("Read", &[0, 1, 2]),
            habit("Run", &[1, 10, 11, 12, 13]),
            habit("Write", &[]),
        ];

        let result = aggregate(&habits, today());

        assert_eq!(result.total_current_streak, 3 + 1);
        assert_eq!(result.total_longest_streak, 4);
    }

    #[test]
    fn preserves_input_order() {
        let habits = [habit("C", &[0]), habit("A", &[0, 1]), habit("B", &[])];

        let result = aggregate(&habits, today());

        let names: Vec<_> = result
            .individual_habit_streaks
            .iter()
            .map(|s| s.habit_name.as_str())
            .collect();
        assert_eq!(names, ["C", "A", "B"]);
        assert_eq!(result.individual_habit_streaks[1].habit_id, habits[1].id());
    }

    #[test]
    fn most_streak_ties_go_to_first() {
        let five = [0, 1, 2, 3, 4];
        let habits = [habit("Short", &[0]), habit("First", &five), habit("Second", &five)];

        let result = aggregate(&habits, today());

        let most = result.most_streak_habit.unwrap();
        assert_eq!(most.habit_name, "First");
        assert_eq!(most.current_streak, 5);
    }

    #[test]
    fn least_streak_ties_go_to_first() {
        let habits = [habit("Busy", &[0, 1]), habit("Idle", &[9]), habit("Lazy", &[])];

        let result = aggregate(&habits, today());

        let least = result.least_streak_habit.unwrap();
        assert_eq!(least.habit_name, "Idle");
        assert_eq!(least.current_streak, 0);
    }

    #[test]
    fn single_habit_is_both_most_and_least() {
        let habits = [habit("Only", &[0])];

        let result = aggregate(&habits, today());

        assert_eq!(result.most_streak_habit, result.least_streak_habit);
        assert_eq!(result.most_streak_habit.unwrap().habit_name, "Only");
    }
}
