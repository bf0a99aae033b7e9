//! Core of the Airport Ranger tools.
//!
//! Loads an airport table, turns a speed and a flight time into a
//! straight-line range, and finds every airport inside that range around a
//! departure airport.

pub mod dataset;
pub mod math;
pub mod prelude;
pub mod query;
pub mod search;
pub mod telemetry;

pub use dataset::{AirportCategory, AirportDataset, AirportRecord, AirportSource, CsvSource, DatasetSchema};
pub use prelude::{DataLoadError, RangeError, RangeResult};
pub use search::{run_search, SearchOutcome, SearchRequest};
