//! Main menu entries.

use crate::models::Stat;

/// A valid main menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Print a cross table of the given statistic.
    Table(Stat),
    /// Adjust zip code filters.
    Filters,
    /// Load the configured dataset.
    Load,
    /// Leave the session.
    Quit,
}

impl MenuChoice {
    /// Map a menu number to its entry.
    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(MenuChoice::Table(Stat::Avg)),
            2 => Some(MenuChoice::Table(Stat::Min)),
            3 => Some(MenuChoice::Table(Stat::Max)),
            4 => Some(MenuChoice::Filters),
            5 => Some(MenuChoice::Load),
            9 => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Parse a typed integer, allowing a sign.
///
/// Integers too large for `i64` saturate so they still read as numbers
/// (and fall outside every valid range). Returns `None` for anything that
/// is not an integer at all.
pub fn parse_number(input: &str) -> Option<i64> {
    let input = input.trim();
    if let Ok(number) = input.parse::<i64>() {
        return Some(number);
    }

    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(if negative { i64::MIN } else { i64::MAX })
}

/// The main menu text.
pub fn menu_text() -> String {
    let mut text = String::from("Main Menu\n");
    for (number, stat) in [(1, Stat::Avg), (2, Stat::Min), (3, Stat::Max)] {
        text.push_str(&format!(
            "{} - Print {} Particulate Concentration by Zip Code and Time\n",
            number, stat
        ));
    }
    text.push_str("4 - Adjust Zip Code Filters\n");
    text.push_str("5 - Load Data\n");
    text.push_str("9 - Quit\n");
    text
}
