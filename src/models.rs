//! Data models for the air-quality database.
//!
//! This module contains the value types shared by the aggregation engine,
//! the CSV loader and the report generator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Postal code of the sensor location.
    pub zip_code: String,
    /// Time-of-day label (e.g. Morning, Midday, Evening, Night).
    pub time_bucket: String,
    /// Particulate concentration, never negative.
    pub concentration: f64,
}

impl Record {
    /// Creates a new record.
    pub fn new(zip_code: impl Into<String>, time_bucket: impl Into<String>, concentration: f64) -> Self {
        Self {
            zip_code: zip_code.into(),
            time_bucket: time_bucket.into(),
            concentration,
        }
    }
}

/// Statistic selector for cross tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Min,
    Avg,
    Max,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Min => write!(f, "Minimum"),
            Stat::Avg => write!(f, "Average"),
            Stat::Max => write!(f, "Maximum"),
        }
    }
}

/// Min/avg/max of the concentrations for one (zip code, time bucket) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Summary {
    /// Computes the summary of a non-empty set of values.
    ///
    /// Returns `None` when `values` yields nothing.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            min,
            avg: sum / count as f64,
            max,
        })
    }

    /// Returns the value selected by `stat`.
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Min => self.min,
            Stat::Avg => self.avg,
            Stat::Max => self.max,
        }
    }
}

/// Active/inactive flag per zip code, iterated in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    order: Vec<String>,
    active: HashMap<String, bool>,
}

impl FilterState {
    /// Creates a filter state with every zip code active.
    pub fn all_active<I, S>(zip_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for zip in zip_codes {
            let zip = zip.into();
            if !state.active.contains_key(&zip) {
                state.active.insert(zip.clone(), true);
                state.order.push(zip);
            }
        }
        state
    }

    /// Returns whether `zip_code` is active, or `None` if it is unknown.
    pub fn get(&self, zip_code: &str) -> Option<bool> {
        self.active.get(zip_code).copied()
    }

    /// Flips the flag of `zip_code`, returning the new value.
    pub fn toggle(&mut self, zip_code: &str) -> Option<bool> {
        let flag = self.active.get_mut(zip_code)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Iterates over `(zip_code, active)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.order
            .iter()
            .map(|zip| (zip.as_str(), self.active.get(zip).copied().unwrap_or(false)))
    }

    /// Active zip codes in discovery order.
    pub fn active_zip_codes(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, active)| *active).map(|(zip, _)| zip)
    }

    /// Zip code at a 1-based position in the listing.
    pub fn nth_zip_code(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.order.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One row of a cross table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRow {
    pub zip_code: String,
    /// One cell per column; `None` means no readings ("not available").
    pub cells: Vec<Option<f64>>,
}

/// A zip code × time bucket table of one statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTable {
    pub stat: Stat,
    /// Time buckets, in discovery order.
    pub columns: Vec<String>,
    /// Active zip codes, in discovery order.
    pub rows: Vec<CrossRow>,
}

impl CrossTable {
    /// Looks up a cell by its labels.
    ///
    /// The outer `Option` is `None` when either label is not in the table;
    /// the inner one is the cell itself.
    #[allow(dead_code)] // Lookup utility for table consumers
    pub fn cell(&self, zip_code: &str, time_bucket: &str) -> Option<Option<f64>> {
        let col = self.columns.iter().position(|c| c == time_bucket)?;
        let row = self.rows.iter().find(|r| r.zip_code == zip_code)?;
        row.cells.get(col).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_values() {
        let summary = Summary::from_values([3.0, 1.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.avg, 2.0);
        assert_eq!(summary.max, 3.0);
        assert_eq!(summary.get(Stat::Avg), 2.0);

        assert!(Summary::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_stat_display() {
        assert_eq!(Stat::Min.to_string(), "Minimum");
        assert_eq!(Stat::Avg.to_string(), "Average");
        assert_eq!(Stat::Max.to_string(), "Maximum");
    }

    #[test]
    fn test_filter_state_order_and_toggle() {
        let mut filters = FilterState::all_active(["94022", "12345", "94022", "94040"]);
        assert_eq!(filters.len(), 3);

        let order: Vec<_> = filters.iter().map(|(zip, _)| zip).collect();
        assert_eq!(order, vec!["94022", "12345", "94040"]);

        assert_eq!(filters.toggle("12345"), Some(false));
        assert_eq!(filters.get("12345"), Some(false));
        assert_eq!(filters.toggle("00000"), None);

        let active: Vec<_> = filters.active_zip_codes().collect();
        assert_eq!(active, vec!["94022", "94040"]);
    }

    #[test]
    fn test_filter_state_nth() {
        let filters = FilterState::all_active(["a", "b"]);
        assert_eq!(filters.nth_zip_code(0), None);
        assert_eq!(filters.nth_zip_code(1), Some("a"));
        assert_eq!(filters.nth_zip_code(2), Some("b"));
        assert_eq!(filters.nth_zip_code(3), None);
    }
}
