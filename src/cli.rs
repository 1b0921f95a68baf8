//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::validate_header;
use crate::models::Stat;
use clap::Parser;
use std::path::PathBuf;

/// AirTab - air-quality cross tables from the command line
///
/// Loads particulate readings from a CSV file and prints minimum, average
/// or maximum concentration by zip code and time of day. Runs an
/// interactive menu unless --table is given.
///
/// Examples:
///   airtab
///   airtab --file ./purple_air.csv --name Eric --header "Data for a cleaner world"
///   airtab --table avg
///   airtab --table max --inactive 95014,94041 --format json
///   airtab --sample --table min
///   airtab --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file with sensor readings
    ///
    /// Defaults to the file named in .airtab.toml, or ./purple_air.csv.
    #[arg(short, long, value_name = "FILE", env = "AIRTAB_FILE")]
    pub file: Option<PathBuf>,

    /// Use the built-in demo dataset instead of a CSV file
    #[arg(long)]
    pub sample: bool,

    /// Your name, used in the greeting (prompted for when omitted)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Header printed above the main menu, at most 30 characters
    /// (prompted for when omitted)
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .airtab.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a single cross table and exit instead of starting the menu
    #[arg(long, value_name = "STAT")]
    pub table: Option<Stat>,

    /// Output format for --table (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Zip codes to mark inactive before printing --table (comma-separated)
    ///
    /// Example: --inactive 95014,94041
    #[arg(long, value_name = "ZIPS", value_delimiter = ',')]
    pub inactive: Option<Vec<String>>,

    /// Decimal places shown in text tables
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Generate a default .airtab.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for one-shot tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref header) = self.header {
            validate_header(header)?;
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.table.is_none() {
            if self.format == OutputFormat::Json {
                return Err("--format json requires --table".to_string());
            }
            if self.inactive.is_some() {
                return Err("--inactive requires --table".to_string());
            }
        }

        if let Some(precision) = self.precision {
            if precision > 10 {
                return Err("Precision must be at most 10 digits".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            file: None,
            sample: false,
            name: None,
            header: None,
            config: None,
            verbose: false,
            quiet: false,
            table: None,
            format: OutputFormat::Text,
            inactive: None,
            precision: None,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_one_shot() {
        let args = Args::parse_from([
            "airtab",
            "--table",
            "max",
            "--inactive",
            "95014,94041",
            "--format",
            "json",
        ]);
        assert_eq!(args.table, Some(Stat::Max));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(
            args.inactive,
            Some(vec!["95014".to_string(), "94041".to_string()])
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_long_header() {
        let mut args = make_args();
        args.header = Some("A header that is much longer than thirty".to_string());
        assert!(args.validate().is_err());

        args.header = Some("Data for a cleaner world".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_one_shot_flags_need_table() {
        let mut args = make_args();
        args.format = OutputFormat::Json;
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.inactive = Some(vec!["94022".to_string()]);
        assert!(args.validate().is_err());

        args.table = Some(Stat::Avg);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
