//! Score display formatting
//!
//! The simulation keeps the score as a raw `u64`; everything here is
//! presentation layered on top.

use crate::settings::NumeralSystem;

/// Render a score with the given digit glyphs
pub fn format_score(score: u64, numerals: NumeralSystem) -> String {
    let digits = numerals.digits();
    score
        .to_string()
        .chars()
        .map(|c| c.to_digit(10).map_or(c, |d| digits[d as usize]))
        .collect()
}

/// HUD strings for one numeral system / language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub score: &'static str,
    pub total_score: &'static str,
    pub game_over: &'static str,
    pub play_again: &'static str,
}

impl Labels {
    pub fn for_numerals(numerals: NumeralSystem) -> Self {
        match numerals {
            NumeralSystem::Khmer => Self {
                score: "ពិន្ទុ",
                total_score: "ពិន្ទុសរុប",
                game_over: "កាកម៉េសចាញ់បាត់",
                play_again: "លេងម្តងទៀត",
            },
            NumeralSystem::Latin => Self {
                score: "Score",
                total_score: "Total score",
                game_over: "Game over",
                play_again: "Play again",
            },
        }
    }
}

/// In-game score line, e.g. "Score: 12"
pub fn score_line(score: u64, numerals: NumeralSystem) -> String {
    let labels = Labels::for_numerals(numerals);
    format!("{}: {}", labels.score, format_score(score, numerals))
}

/// Game-over total line
pub fn total_line(score: u64, numerals: NumeralSystem) -> String {
    let labels = Labels::for_numerals(numerals);
    format!("{}: {}", labels.total_score, format_score(score, numerals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_khmer_digits() {
        assert_eq!(format_score(0, NumeralSystem::Khmer), "០");
        assert_eq!(format_score(1234567890, NumeralSystem::Khmer), "១២៣៤៥៦៧៨៩០");
    }

    #[test]
    fn test_latin_digits() {
        assert_eq!(format_score(42, NumeralSystem::Latin), "42");
    }

    #[test]
    fn test_score_lines() {
        assert_eq!(score_line(7, NumeralSystem::Latin), "Score: 7");
        assert_eq!(total_line(15, NumeralSystem::Khmer), "ពិន្ទុសរុប: ១៥");
    }
}
