//! Command-line front end for parametric FEA sweeps
//!
//! Loads YAML sweep definitions, previews their parameter matrix, renders
//! results for the terminal and exports results tables to CSV or JSON.
//! The sweep engine itself lives in `paramfea_core`.

pub mod data;
pub mod export;
pub mod logging;
pub mod preview;
pub mod report;
pub mod util;

#[cfg(test)]
mod testing;

pub use data::{SweepFile, SweepFileError};
pub use export::{ExportFormat, RowFilter, export_table};
pub use logging::init_logging;
pub use preview::PreviewEngine;
