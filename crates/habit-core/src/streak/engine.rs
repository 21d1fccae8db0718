use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::CompletionDate;

/// Current and longest streak of a single habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitStreak {
    /// Consecutive completed days ending today or yesterday.
    pub current: usize,
    /// Longest run of consecutive completed days anywhere in the history.
    pub longest: usize,
}

/// Compute the current and longest streak of a set of completion days,
/// relative to `today`.
///
/// The input may be unsorted and may contain duplicates. This function is
/// total: empty input yields zero for both streaks.
///
/// The current streak is the run of consecutive completed days ending at
/// `today`, or at the day before if `today` itself is not completed. A habit
/// whose most recent completion is two or more days before `today` has a
/// current streak of zero. Completions after `today` are ignored for the
/// current streak but still count towards the longest.
#[must_use]
pub fn compute_habit_streak<I>(completions: I, today: CompletionDate) -> HabitStreak
where
    I: IntoIterator<Item = CompletionDate>,
{
    let days: BTreeSet<CompletionDate> = completions.into_iter().collect();

    HabitStreak {
        current: current_streak(&days, today),
        longest: longest_streak(&days),
    }
}

fn longest_streak(days: &BTreeSet<CompletionDate>) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<CompletionDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if prev.days_until(day) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

fn current_streak(days: &BTreeSet<CompletionDate>, today: CompletionDate) -> usize {
    let Some(anchor) = streak_anchor(days, today) else {
        return 0;
    };

    let mut count = 0;
    let mut cursor = Some(anchor);
    while let Some(day) = cursor.filter(|day| days.contains(day)) {
        count += 1;
        cursor = day.pred();
    }
    count
}

/// The day a live streak ends on: today if completed, otherwise yesterday if
/// completed.
fn streak_anchor(days: &BTreeSet<CompletionDate>, today: CompletionDate) -> Option<CompletionDate> {
    if days.contains(&today) {
        return Some(today);
    }
    today.pred().filter(|yesterday| days.contains(yesterday))
}
