//! Cross-tabulation of readings by zip code and time of day.
//!
//! The [`Aggregator`] starts out unloaded. [`Aggregator::load`] replaces the
//! whole dataset at once; every other query fails with
//! [`AggregatorError::NoDatasetLoaded`] until the first successful load.

use crate::error::AggregatorError;
use crate::models::{CrossRow, CrossTable, FilterState, Record, Stat, Summary};
use std::collections::HashSet;
use tracing::{debug, info};

/// A loaded dataset with its derived labels and filters.
#[derive(Debug, Clone)]
struct Dataset {
    records: Vec<Record>,
    zip_codes: Vec<String>,
    time_buckets: Vec<String>,
    filters: FilterState,
}

impl Dataset {
    fn new(records: Vec<Record>) -> Self {
        let zip_codes = distinct(records.iter().map(|r| r.zip_code.as_str()));
        let time_buckets = distinct(records.iter().map(|r| r.time_bucket.as_str()));
        let filters = FilterState::all_active(zip_codes.iter().cloned());

        Self {
            records,
            zip_codes,
            time_buckets,
            filters,
        }
    }
}

/// Distinct labels in first-seen order.
fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .filter(|label| seen.insert(*label))
        .map(String::from)
        .collect()
}

/// Holds the readings and the per-zip-code filter state.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    dataset: Option<Dataset>,
}

impl Aggregator {
    /// Creates an aggregator with no dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current dataset and returns the number of records loaded.
    ///
    /// All zip codes start out active. An empty input is rejected and leaves
    /// any previous dataset in place.
    pub fn load(&mut self, records: Vec<Record>) -> Result<usize, AggregatorError> {
        if records.is_empty() {
            return Err(AggregatorError::EmptyInput);
        }

        let dataset = Dataset::new(records);
        let count = dataset.records.len();

        info!(
            records = count,
            zip_codes = dataset.zip_codes.len(),
            time_buckets = dataset.time_buckets.len(),
            "Dataset loaded"
        );

        self.dataset = Some(dataset);
        Ok(count)
    }

    /// Whether a dataset has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Number of loaded records (0 when unloaded).
    pub fn len(&self) -> usize {
        self.dataset.as_ref().map_or(0, |d| d.records.len())
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dataset(&self) -> Result<&Dataset, AggregatorError> {
        self.dataset.as_ref().ok_or(AggregatorError::NoDatasetLoaded)
    }

    /// Distinct zip codes in discovery order.
    pub fn zip_codes(&self) -> Result<&[String], AggregatorError> {
        Ok(&self.dataset()?.zip_codes)
    }

    /// Distinct time buckets in discovery order.
    pub fn time_buckets(&self) -> Result<&[String], AggregatorError> {
        Ok(&self.dataset()?.time_buckets)
    }

    /// Returns a copy of the current filter state.
    pub fn list_zip_codes(&self) -> Result<FilterState, AggregatorError> {
        Ok(self.dataset()?.filters.clone())
    }

    /// Flips the active flag of `zip_code` and returns the new value.
    pub fn toggle(&mut self, zip_code: &str) -> Result<bool, AggregatorError> {
        let dataset = self
            .dataset
            .as_mut()
            .ok_or(AggregatorError::NoDatasetLoaded)?;

        let active = dataset
            .filters
            .toggle(zip_code)
            .ok_or_else(|| AggregatorError::UnknownZipCode(zip_code.to_string()))?;

        debug!(zip_code, active, "Zip code toggled");
        Ok(active)
    }

    /// Min/avg/max concentration for an exact (zip code, time bucket) match.
    pub fn statistic(&self, zip_code: &str, time_bucket: &str) -> Result<Summary, AggregatorError> {
        let dataset = self.dataset()?;

        let values = dataset
            .records
            .iter()
            .filter(|r| r.zip_code == zip_code && r.time_bucket == time_bucket)
            .map(|r| r.concentration);

        Summary::from_values(values).ok_or_else(|| AggregatorError::NoMatchingRecords {
            zip_code: zip_code.to_string(),
            time_bucket: time_bucket.to_string(),
        })
    }

    /// Builds the table of `stat` for every active zip code and time bucket.
    ///
    /// Pairs without readings become `None` cells.
    pub fn cross_table(&self, stat: Stat) -> Result<CrossTable, AggregatorError> {
        let dataset = self.dataset()?;
        let mut rows = Vec::new();

        for zip_code in dataset.filters.active_zip_codes() {
            let mut cells = Vec::with_capacity(dataset.time_buckets.len());

            for time_bucket in &dataset.time_buckets {
                let cell = match self.statistic(zip_code, time_bucket) {
                    Ok(summary) => Some(summary.get(stat)),
                    Err(AggregatorError::NoMatchingRecords { .. }) => None,
                    Err(e) => return Err(e),
                };
                cells.push(cell);
            }

            rows.push(CrossRow {
                zip_code: zip_code.to_string(),
                cells,
            });
        }

        debug!(%stat, rows = rows.len(), "Cross table computed");

        Ok(CrossTable {
            stat,
            columns: dataset.time_buckets.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::sample_records;

    fn loaded() -> Aggregator {
        let mut aggregator = Aggregator::new();
        aggregator.load(sample_records()).unwrap();
        aggregator
    }

    #[test]
    fn test_load_returns_count_and_activates_all() {
        let mut aggregator = Aggregator::new();
        assert_eq!(aggregator.load(sample_records()).unwrap(), 6);
        assert!(aggregator.is_loaded());
        assert_eq!(aggregator.len(), 6);

        let filters = aggregator.list_zip_codes().unwrap();
        let zips: Vec<_> = filters.iter().collect();
        assert_eq!(
            zips,
            vec![("12345", true), ("94022", true), ("94040", true)]
        );
    }

    #[test]
    fn test_load_empty_input() {
        let mut aggregator = Aggregator::new();
        assert_eq!(aggregator.load(Vec::new()), Err(AggregatorError::EmptyInput));
        assert!(!aggregator.is_loaded());
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut aggregator = loaded();
        aggregator.toggle("12345").unwrap();

        assert!(aggregator.load(Vec::new()).is_err());
        assert_eq!(aggregator.len(), 6);
        assert_eq!(aggregator.list_zip_codes().unwrap().get("12345"), Some(false));
    }

    #[test]
    fn test_reload_resets_filters_and_labels() {
        let mut aggregator = loaded();
        aggregator.toggle("94022").unwrap();

        let count = aggregator
            .load(vec![
                Record::new("94022", "Night", 4.0),
                Record::new("95014", "Night", 2.0),
            ])
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(aggregator.zip_codes().unwrap(), ["94022", "95014"]);
        assert_eq!(aggregator.time_buckets().unwrap(), ["Night"]);
        assert_eq!(aggregator.list_zip_codes().unwrap().get("94022"), Some(true));
        assert_eq!(aggregator.list_zip_codes().unwrap().get("12345"), None);
    }

    #[test]
    fn test_labels_in_discovery_order() {
        let aggregator = loaded();
        assert_eq!(aggregator.zip_codes().unwrap(), ["12345", "94022", "94040"]);
        assert_eq!(
            aggregator.time_buckets().unwrap(),
            ["Morning", "Midday", "Evening"]
        );
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut aggregator = loaded();
        let before = aggregator.list_zip_codes().unwrap();

        assert!(!aggregator.toggle("94040").unwrap());
        assert!(aggregator.toggle("94040").unwrap());

        assert_eq!(aggregator.list_zip_codes().unwrap(), before);
    }

    #[test]
    fn test_toggle_unknown_zip_code() {
        let mut aggregator = loaded();
        let before = aggregator.list_zip_codes().unwrap();

        assert_eq!(
            aggregator.toggle("00000"),
            Err(AggregatorError::UnknownZipCode("00000".to_string()))
        );
        assert_eq!(aggregator.list_zip_codes().unwrap(), before);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let aggregator = loaded();
        let mut snapshot = aggregator.list_zip_codes().unwrap();
        snapshot.toggle("12345");

        assert_eq!(aggregator.list_zip_codes().unwrap().get("12345"), Some(true));
    }

    #[test]
    fn test_statistic_values() {
        let aggregator = loaded();
        let summary = aggregator.statistic("94040", "Morning").unwrap();

        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.avg, 2.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_statistic_no_match() {
        let aggregator = loaded();
        assert_eq!(
            aggregator.statistic("94022", "Night"),
            Err(AggregatorError::NoMatchingRecords {
                zip_code: "94022".to_string(),
                time_bucket: "Night".to_string(),
            })
        );
        // Matching is case-sensitive.
        assert!(aggregator.statistic("94040", "morning").is_err());
    }

    #[test]
    fn test_statistic_order_independent() {
        let mut reversed = sample_records();
        reversed.reverse();

        let mut other = Aggregator::new();
        other.load(reversed).unwrap();

        let aggregator = loaded();
        for zip in ["12345", "94022", "94040"] {
            for time in ["Morning", "Midday", "Evening"] {
                assert_eq!(aggregator.statistic(zip, time), other.statistic(zip, time));
            }
        }
    }

    #[test]
    fn test_queries_before_load() {
        let mut aggregator = Aggregator::new();

        assert_eq!(aggregator.list_zip_codes(), Err(AggregatorError::NoDatasetLoaded));
        assert_eq!(aggregator.toggle("12345"), Err(AggregatorError::NoDatasetLoaded));
        assert_eq!(
            aggregator.statistic("12345", "Morning"),
            Err(AggregatorError::NoDatasetLoaded)
        );
        assert_eq!(
            aggregator.cross_table(Stat::Avg),
            Err(AggregatorError::NoDatasetLoaded)
        );
        assert_eq!(aggregator.zip_codes(), Err(AggregatorError::NoDatasetLoaded));
    }

    #[test]
    fn test_cross_table_avg() {
        let aggregator = loaded();
        let table = aggregator.cross_table(Stat::Avg).unwrap();

        assert_eq!(table.stat, Stat::Avg);
        assert_eq!(table.columns, vec!["Morning", "Midday", "Evening"]);
        assert_eq!(table.rows.len(), 3);

        assert_eq!(table.cell("94022", "Morning"), Some(Some(2.2)));
        assert_eq!(table.cell("12345", "Evening"), Some(None));
        assert_eq!(table.cell("94040", "Morning"), Some(Some(2.0)));
    }

    #[test]
    fn test_cross_table_min_max() {
        let aggregator = loaded();

        let min = aggregator.cross_table(Stat::Min).unwrap();
        assert_eq!(min.cell("94040", "Morning"), Some(Some(1.0)));

        let max = aggregator.cross_table(Stat::Max).unwrap();
        assert_eq!(max.cell("94040", "Morning"), Some(Some(3.0)));
    }

    #[test]
    fn test_cross_table_skips_inactive() {
        let mut aggregator = loaded();
        aggregator.toggle("94022").unwrap();

        let table = aggregator.cross_table(Stat::Max).unwrap();
        let zips: Vec<_> = table.rows.iter().map(|r| r.zip_code.as_str()).collect();

        assert_eq!(zips, vec!["12345", "94040"]);
        assert_eq!(table.cell("94022", "Morning"), None);
    }

    #[test]
    fn test_cross_table_all_inactive() {
        let mut aggregator = loaded();
        for zip in ["12345", "94022", "94040"] {
            aggregator.toggle(zip).unwrap();
        }

        let table = aggregator.cross_table(Stat::Avg).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.columns.len(), 3);
    }
}
