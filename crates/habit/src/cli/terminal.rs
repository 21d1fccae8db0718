//! Terminal capability detection and colour helpers

use owo_colors::{colors::css, OwoColorize};

/// Detects whether coloured output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// How a piece of terminal text is emphasised.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
    Dim,
}

fn paint(text: &str, tone: Tone) -> String {
    if !supports_color() {
        return text.to_string();
    }
    match tone {
        Tone::Success => text.fg::<css::Green>().to_string(),
        Tone::Warning => text.fg::<css::Orange>().to_string(),
        Tone::Info => text.fg::<css::LightBlue>().to_string(),
        Tone::Dim => text.dimmed().to_string(),
    }
}

/// Colours for anything string-like. Plain text is returned when the terminal
/// does not support colour.
pub trait Colorize: AsRef<str> {
    /// Green: something worked, or a streak is alive.
    fn success(&self) -> String {
        paint(self.as_ref(), Tone::Success)
    }

    /// Amber: a habit needs attention.
    fn warning(&self) -> String {
        paint(self.as_ref(), Tone::Warning)
    }

    /// Blue: headings.
    fn info(&self) -> String {
        paint(self.as_ref(), Tone::Info)
    }

    /// Secondary detail.
    fn dim(&self) -> String {
        paint(self.as_ref(), Tone::Dim)
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}

/// Render a streak length, highlighting live streaks.
pub fn streak_label(days: usize) -> String {
    match days {
        0 => "0".dim(),
        1 => "1 day".success(),
        n => format!("{n} days").success(),
    }
}

/// Truncate `text` to at most `width` characters, marking the cut with '…'.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::{truncate, Colorize};

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Read", 10), "Read");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Drink more water", 6), "Drink…");
    }

    #[test]
    fn colorize_keeps_the_text() {
        assert!("Read".dim().contains("Read"));
        assert!(String::from("Run").success().contains("Run"));
        assert!(format!("{} days", 3).warning().contains("3 days"));
    }
}
