//! Parametric FEA sweep library
//!
//! Runs a finite element analysis once for every combination of a set of
//! model parameters and collects one scalar row per run. It supports:
//! - Variables as explicit value lists or evenly spaced numeric ranges
//! - Outputs reduced from raw result fields by named, pluggable reductions
//! - Per-combination failure isolation (mutation, solve, extraction)
//! - Dry runs that enumerate and verify without solving
//! - Optional per-run field export and baseline restore
//!
//! The CAD/FEA engine itself sits behind the [`engine::FeaEngine`] trait.
//!
//! # Example
//!
//! ```ignore
//! use paramfea_core::{RunOptions, SweepBuilder, SweepOrchestrator};
//!
//! let config = SweepBuilder::new()
//!     .linspace("Sketch", "HoleDiam", 10.0, 30.0, 3)
//!     .variable("MaterialSolid", "Material", ["Aluminium-Generic", "Steel-Generic"])
//!     .build()?;
//!
//! let mut sweep = SweepOrchestrator::new(config);
//! let table = sweep.run(&mut engine, &RunOptions::default())?;
//! for row in &table {
//!     println!("{} {}", row.index(), row.status());
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod engine;
pub mod error;
pub mod reduction;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{OutputDefinition, RunOptions, SweepBuilder, SweepConfig, VariableDefinition};
pub use engine::FeaEngine;
pub use model::{ResultsTable, RunResult, RunStatus};
pub use reduction::Reduction;
pub use sweep::{SweepOrchestrator, SweepProgress, SweepState};
