//! On-disk sweep definitions

pub mod sweep_file;

pub use sweep_file::{ReductionKind, SweepFile, SweepFileError};
