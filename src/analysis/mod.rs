//! Aggregation engine.
//!
//! Owns the loaded readings and answers statistic and cross-table queries.

pub mod aggregator;

pub use aggregator::*;
