//! Interactive menu session.
//!
//! This module drives the aggregator from a line-based prompt: the main
//! menu, zip code filter management and data loading. `one_shot` prints a
//! single table for `--table` runs.

pub mod menu;
pub mod one_shot;
pub mod session_loop;

pub use session_loop::Session;
