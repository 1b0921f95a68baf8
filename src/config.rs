//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.airtab.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".airtab.toml";

/// Longest menu header accepted.
pub const MAX_HEADER_LEN: usize = 30;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Table display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Header printed above the main menu. Prompted for when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Name used in the greeting. Prompted for when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Input CSV settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file read by the "Load Data" menu entry.
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Load the built-in demo dataset instead of `file`.
    #[serde(default)]
    pub use_sample: bool,

    /// Whether the first CSV row is a header.
    #[serde(default = "default_true")]
    pub has_headers: bool,

    /// Zero-based column of the zip code.
    #[serde(default = "default_zip_column")]
    pub zip_column: usize,

    /// Zero-based column of the time-of-day bucket.
    #[serde(default = "default_time_column")]
    pub time_column: usize,

    /// Zero-based column of the particulate concentration.
    #[serde(default = "default_concentration_column")]
    pub concentration_column: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            use_sample: false,
            has_headers: true,
            zip_column: default_zip_column(),
            time_column: default_time_column(),
            concentration_column: default_concentration_column(),
        }
    }
}

fn default_file() -> PathBuf {
    PathBuf::from("./purple_air.csv")
}

fn default_true() -> bool {
    true
}

fn default_zip_column() -> usize {
    1
}

fn default_time_column() -> usize {
    4
}

fn default_concentration_column() -> usize {
    5
}

/// Cross table layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for cell values.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Width of each value column.
    #[serde(default = "default_cell_width")]
    pub cell_width: usize,

    /// Width of the zip code column.
    #[serde(default = "default_row_label_width")]
    pub row_label_width: usize,

    /// Marker for cells without readings.
    #[serde(default = "default_not_available")]
    pub not_available: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            cell_width: default_cell_width(),
            row_label_width: default_row_label_width(),
            not_available: default_not_available(),
        }
    }
}

fn default_precision() -> usize {
    2
}

fn default_cell_width() -> usize {
    8
}

fn default_row_label_width() -> usize {
    7
}

fn default_not_available() -> String {
    "N/A".to_string()
}

/// Check a menu header against the length limit.
pub fn validate_header(header: &str) -> Result<(), String> {
    if header.chars().count() > MAX_HEADER_LEN {
        return Err(format!(
            "Header must be a string less than or equal to {} characters long",
            MAX_HEADER_LEN
        ));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject values the session cannot work with.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref header) = self.general.header {
            if let Err(e) = validate_header(header) {
                bail!(e);
            }
        }

        let columns = [
            self.data.zip_column,
            self.data.time_column,
            self.data.concentration_column,
        ];
        if columns[0] == columns[1] || columns[0] == columns[2] || columns[1] == columns[2] {
            bail!("zip_column, time_column and concentration_column must differ");
        }

        if self.display.cell_width == 0 || self.display.row_label_width == 0 {
            bail!("Display widths must be at least 1");
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref file) = args.file {
            self.data.file = file.clone();
        }
        if args.sample {
            self.data.use_sample = true;
        }

        if let Some(ref header) = args.header {
            self.general.header = Some(header.clone());
        }
        if let Some(ref name) = args.name {
            self.general.user_name = Some(name.clone());
        }

        if let Some(precision) = args.precision {
            self.display.precision = precision;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
