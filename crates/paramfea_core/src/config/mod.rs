//! Sweep configuration
//!
//! `SweepConfig` holds everything that defines a sweep: the variables to
//! enumerate, the outputs to extract and the solver identifiers. Run-time
//! switches that do not change the parameter space live in `RunOptions`.
//!
//! # Builder DSL
//!
//! ```ignore
//! use paramfea_core::config::{SweepBuilder, OutputDefinition};
//! use paramfea_core::reduction::Reduction;
//!
//! let config = SweepBuilder::new()
//!     .linspace("Sketch", "HoleDiam", 10.0, 30.0, 3)
//!     .variable("MaterialSolid", "Material", ["Aluminium-Generic", "Steel-Generic"])
//!     .output(OutputDefinition::new("vonMises", Reduction::median()))
//!     .output(OutputDefinition::new("vonMises", Reduction::percentile(95.0))
//!         .with_label("95th percentile"))
//!     .solver("CCX_Results", "SolverCcxTools")
//!     .build()?;
//! ```

use std::path::PathBuf;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub mod builder;
pub mod outputs;
pub mod variables;

pub use builder::SweepBuilder;
pub use outputs::{DISPLACEMENT_LENGTHS, OutputDefinition, VON_MISES};
pub use variables::VariableDefinition;

/// Default name of the result container in the model document
pub const DEFAULT_RESULTS_NAME: &str = "CCX_Results";
/// Default name of the solver object in the model document
pub const DEFAULT_SOLVER_NAME: &str = "SolverCcxTools";

/// Names of the analysis objects the engine solves with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Result-set (analysis results container) name
    pub results_name: String,
    pub solver_name: String,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            results_name: DEFAULT_RESULTS_NAME.to_string(),
            solver_name: DEFAULT_SOLVER_NAME.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_solve_attempts() -> u32 {
    1
}

/// Per-run switches for one sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Enumerate and record combinations without solving
    #[serde(default)]
    pub dry_run: bool,

    /// In a dry run, still push every combination through the model mutator
    #[serde(default = "default_true")]
    pub verify_mutations: bool,

    /// Ask the engine to write solved fields for every successful run
    #[serde(default)]
    pub export_results: bool,

    /// Folder for exported fields (defaults to the model document's folder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,

    /// Solve attempts per combination; 1 means failures are never retried
    #[serde(default = "default_solve_attempts")]
    pub max_solve_attempts: u32,

    /// Stop after this many combinations (explicit truncation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Write the pre-sweep property values back once the sweep ends
    #[serde(default = "default_true")]
    pub restore_baseline: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verify_mutations: true,
            export_results: false,
            output_folder: None,
            max_solve_attempts: 1,
            limit: None,
            restore_baseline: true,
        }
    }
}

impl RunOptions {
    /// Options for a preview run
    #[must_use]
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }
}

/// Complete sweep definition
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub variables: Vec<VariableDefinition>,
    pub outputs: Vec<OutputDefinition>,
    pub solver: SolverSettings,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            outputs: OutputDefinition::defaults(),
            solver: SolverSettings::default(),
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of combinations in the full parameter space
    pub fn total_points(&self) -> Result<usize, ConfigurationError> {
        if self.variables.is_empty() {
            return Err(ConfigurationError::EmptyParameterSpace);
        }
        self.variables
            .iter()
            .try_fold(1usize, |acc, v| acc.checked_mul(v.len()))
            .ok_or(ConfigurationError::ParameterSpaceTooLarge)
    }

    /// Column labels of the parameter columns, in declaration order
    pub fn parameter_labels(&self) -> Vec<String> {
        self.variables.iter().map(VariableDefinition::label).collect()
    }

    /// Column labels of the output columns, in declaration order
    pub fn output_labels(&self) -> Vec<String> {
        self.outputs.iter().map(OutputDefinition::label).collect()
    }

    /// Check every configuration-time invariant.
    ///
    /// Variables must be present and target distinct properties, and all
    /// column labels (parameters and outputs together) must be unique.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.total_points()?;

        let mut targets = FxHashSet::default();
        for var in &self.variables {
            if !targets.insert(var.target()) {
                return Err(ConfigurationError::DuplicateVariable(var.target().clone()));
            }
        }

        let mut labels = FxHashSet::default();
        for label in self.parameter_labels().into_iter().chain(self.output_labels()) {
            if !labels.insert(label.clone()) {
                return Err(ConfigurationError::DuplicateLabel(label));
            }
        }

        if self.solver.results_name.trim().is_empty() || self.solver.solver_name.trim().is_empty()
        {
            return Err(ConfigurationError::EmptySolverName);
        }

        Ok(())
    }
}
