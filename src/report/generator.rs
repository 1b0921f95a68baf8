//! Text and JSON rendering of cross tables and filter listings.
//!
//! The aggregation engine produces plain values; every width, decimal place
//! and marker is decided here.

use crate::config::DisplayConfig;
use crate::models::{CrossTable, FilterState, Stat};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Render a cross table as fixed-width text.
///
/// Begins with a blank line, then the column header, then one line per
/// active zip code.
pub fn render_cross_table(table: &CrossTable, display: &DisplayConfig) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&generate_header_line(&table.columns, display));

    for row in &table.rows {
        output.push_str(&format!(
            "{:<width$}",
            row.zip_code,
            width = display.row_label_width
        ));
        for cell in &row.cells {
            output.push_str(&format_cell(*cell, display));
        }
        output.push('\n');
    }

    output
}

fn generate_header_line(columns: &[String], display: &DisplayConfig) -> String {
    let mut line = " ".repeat(display.row_label_width);
    for column in columns {
        line.push_str(&format!("{:>width$}", column, width = display.cell_width));
    }
    line.push('\n');
    line
}

fn format_cell(cell: Option<f64>, display: &DisplayConfig) -> String {
    match cell {
        Some(value) => format!(
            "{:>width$.prec$}",
            value,
            width = display.cell_width,
            prec = display.precision
        ),
        None => format!("{:>width$}", display.not_available, width = display.cell_width),
    }
}

/// Render the numbered zip code listing shown by the filter menu.
pub fn render_filters(filters: &FilterState) -> String {
    let mut output = String::new();

    for (i, (zip_code, active)) in filters.iter().enumerate() {
        let status = if active { "ACTIVE" } else { "INACTIVE" };
        output.push_str(&format!("{}: {:<7} {}\n", i + 1, zip_code, status));
    }

    output
}

#[derive(Serialize)]
struct JsonTable<'a> {
    generated_at: DateTime<Utc>,
    stat: Stat,
    columns: &'a [String],
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    zip_code: &'a str,
    values: &'a [Option<f64>],
}

/// Generate a JSON report of a cross table. Missing cells are `null`.
pub fn generate_json_report(table: &CrossTable) -> Result<String> {
    let report = JsonTable {
        generated_at: Utc::now(),
        stat: table.stat,
        columns: &table.columns,
        rows: table
            .rows
            .iter()
            .map(|row| JsonRow {
                zip_code: &row.zip_code,
                values: &row.cells,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).map_err(Into::into)
}
