//! The interactive session loop.
//!
//! Generic over its input and output so the whole dialogue can run against
//! in-memory buffers. End of input ends the session like "Quit" does.

use crate::analysis::Aggregator;
use crate::config::{validate_header, Config};
use crate::error::AggregatorError;
use crate::loader::{self, LoadOptions};
use crate::models::Stat;
use crate::report::{render_cross_table, render_filters};
use crate::session::menu::{menu_text, parse_number, MenuChoice};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const LOAD_FIRST: &str = "Please load a dataset first";

/// Whether the session should keep going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// A user session over one aggregator.
pub struct Session<R, W> {
    aggregator: Aggregator,
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session with an unloaded aggregator.
    pub fn new(config: Config, input: R, output: W) -> Self {
        Self {
            aggregator: Aggregator::new(),
            config,
            input,
            output,
        }
    }

    /// The aggregator driven by this session.
    #[allow(dead_code)] // Inspection hook for embedding callers
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Greet the user, settle the menu header and run the main menu.
    pub fn run(&mut self) -> Result<()> {
        let Some(name) = self.user_name()? else {
            return Ok(());
        };
        writeln!(
            self.output,
            "Hi {}, welcome to the Air Quality database.",
            name
        )?;

        let Some(header) = self.menu_header()? else {
            return Ok(());
        };

        self.main_menu(&header)
    }

    fn user_name(&mut self) -> Result<Option<String>> {
        if let Some(ref name) = self.config.general.user_name {
            return Ok(Some(name.clone()));
        }
        self.prompt("Please enter your name: ")
    }

    fn menu_header(&mut self) -> Result<Option<String>> {
        if let Some(ref header) = self.config.general.header {
            return Ok(Some(header.clone()));
        }

        loop {
            let Some(header) = self.prompt("Enter a header for the menu: ")? else {
                return Ok(None);
            };
            match validate_header(&header) {
                Ok(()) => return Ok(Some(header)),
                Err(message) => writeln!(self.output, "{}", message)?,
            }
        }
    }

    fn main_menu(&mut self, header: &str) -> Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", header)?;
            write!(self.output, "{}", menu_text())?;

            let Some(line) = self.prompt("What is your choice? ")? else {
                debug!("Input closed, leaving session");
                return Ok(());
            };

            let Some(number) = parse_number(&line) else {
                writeln!(self.output, "Please enter a number only")?;
                continue;
            };

            let flow = match MenuChoice::from_number(number) {
                Some(MenuChoice::Table(stat)) => self.print_table(stat)?,
                Some(MenuChoice::Filters) => self.manage_filters()?,
                Some(MenuChoice::Load) => self.load_data()?,
                Some(MenuChoice::Quit) => {
                    writeln!(self.output, "Goodbye! Thank you for using the database")?;
                    Flow::Exit
                }
                None => {
                    writeln!(self.output, "That's not a valid selection")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn print_table(&mut self, stat: Stat) -> Result<Flow> {
        match self.aggregator.cross_table(stat) {
            Ok(table) => {
                write!(
                    self.output,
                    "{}",
                    render_cross_table(&table, &self.config.display)
                )?;
            }
            Err(AggregatorError::NoDatasetLoaded) => writeln!(self.output, "{}", LOAD_FIRST)?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn manage_filters(&mut self) -> Result<Flow> {
        let filters = match self.aggregator.list_zip_codes() {
            Ok(filters) if !filters.is_empty() => filters,
            _ => {
                writeln!(self.output, "{}", LOAD_FIRST)?;
                return Ok(Flow::Continue);
            }
        };

        debug!(zip_codes = filters.len(), "Managing filters");
        writeln!(self.output, "The following labels are in the dataset: ")?;
        write!(self.output, "{}", render_filters(&filters))?;

        loop {
            let Some(line) = self.prompt(
                "Please select an item to toggle or press enter/return when you are finished. ",
            )?
            else {
                return Ok(Flow::Exit);
            };

            let line = line.trim();
            if line.is_empty() {
                return Ok(Flow::Continue);
            }

            let Some(number) = parse_number(line) else {
                writeln!(self.output, "Please enter a number or enter/return to exit")?;
                continue;
            };

            let position = usize::try_from(number).ok();
            let Some(zip_code) = position.and_then(|p| filters.nth_zip_code(p)) else {
                writeln!(self.output, "Please enter a number from the list")?;
                continue;
            };

            match self.aggregator.toggle(zip_code) {
                Ok(_) => {
                    let current = self.aggregator.list_zip_codes()?;
                    write!(self.output, "{}", render_filters(&current))?;
                }
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn load_data(&mut self) -> Result<Flow> {
        let records = if self.config.data.use_sample {
            info!("Loading built-in sample dataset");
            loader::sample_records()
        } else {
            let path = &self.config.data.file;
            match loader::load_records(path, &LoadOptions::from(&self.config.data)) {
                Ok(records) => records,
                Err(e) => {
                    warn!("Load of {} failed: {}", path.display(), e);
                    writeln!(self.output, "Unable to load {}: {}", path.display(), e)?;
                    return Ok(Flow::Continue);
                }
            }
        };

        match self.aggregator.load(records) {
            Ok(count) => writeln!(self.output, "{} lines loaded", count)?,
            Err(e) => {
                warn!("Dataset rejected: {}", e);
                writeln!(self.output, "Unable to load data: {}", e)?;
            }
        }

        Ok(Flow::Continue)
    }

    /// Print `message`, then read one line without its line ending.
    ///
    /// Returns `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        Ok(Some(trimmed.to_string()))
    }
}
