//! Non-interactive mode: load, apply filters, print one table.

use crate::analysis::Aggregator;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::loader::{self, LoadOptions};
use crate::models::{Record, Stat};
use crate::report::{generate_json_report, render_cross_table};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info};

/// Load the dataset, deactivate `inactive` zip codes and write one table.
///
/// Zip codes listed more than once stay inactive. An unknown zip code is an
/// error and nothing is written.
pub fn print_table<W: Write>(
    config: &Config,
    stat: Stat,
    format: OutputFormat,
    inactive: &[String],
    output: &mut W,
) -> Result<()> {
    let mut aggregator = Aggregator::new();
    let count = aggregator
        .load(read_dataset(config)?)
        .context("Failed to load dataset")?;
    info!("{} lines loaded", count);

    let (zip_codes, time_buckets) = (aggregator.zip_codes()?, aggregator.time_buckets()?);
    debug!(?zip_codes, ?time_buckets, "Dataset labels");

    for zip_code in inactive {
        let filters = aggregator.list_zip_codes()?;
        if filters.get(zip_code) != Some(false) {
            aggregator.toggle(zip_code)?;
        }
    }

    let table = aggregator.cross_table(stat)?;

    match format {
        OutputFormat::Json => writeln!(output, "{}", generate_json_report(&table)?)?,
        OutputFormat::Text => write!(output, "{}", render_cross_table(&table, &config.display))?,
    }

    Ok(())
}

/// Read the records selected by the data configuration.
fn read_dataset(config: &Config) -> Result<Vec<Record>> {
    if config.data.use_sample {
        info!("Using built-in sample dataset");
        return Ok(loader::sample_records());
    }

    let path = &config.data.file;
    info!("Reading {}", path.display());
    loader::load_records(path, &LoadOptions::from(&config.data))
        .with_context(|| format!("Failed to read {}", path.display()))
}
