//! Boundary with the external CAD/FEA engine.
//!
//! The engine owns one mutable model document and one solver state. It is
//! neither reentrant nor thread-safe, so every method takes the engine by
//! exclusive or shared reference and the orchestrator threads a single
//! `&mut E` through mutate, solve and extract in strict sequence.

use std::path::Path;

use crate::error::{ExportError, MutationError, SolveError};
use crate::model::{ParamValue, Target};

/// A live CAD/FEA model plus the solver that analyses it.
///
/// Loading the document, discovering the engine installation and launching
/// its process are the implementor's business; the sweep only needs the
/// operations below.
pub trait FeaEngine {
    /// Handle to the results of one successful solve
    type Solved;

    /// Assign `value` to `target` in the live document
    fn set(&mut self, target: &Target, value: &ParamValue) -> Result<(), MutationError>;

    /// Current value of `target`, if the engine can report it.
    ///
    /// Used to snapshot the document before a sweep so it can be restored
    /// afterwards. The default reports nothing, which disables restoring.
    fn get(&self, _target: &Target) -> Option<ParamValue> {
        None
    }

    /// Rebuild geometry after a batch of assignments.
    ///
    /// The error's target names the last property assigned before the failure.
    fn recompute(&mut self, _last: &Target) -> Result<(), MutationError> {
        Ok(())
    }

    /// Run the solver to completion. Blocks for the whole solve.
    fn solve(&mut self, results_name: &str, solver_name: &str) -> Result<Self::Solved, SolveError>;

    /// Raw per-node or per-element values of a result field; `None` when absent
    fn read_field(&self, solved: &Self::Solved, field: &str) -> Option<Vec<f64>>;

    /// Write the solved fields to `path` (e.g. a `.vtu` file)
    fn export_fields(&mut self, _solved: &Self::Solved, _path: &Path) -> Result<(), ExportError> {
        Err(ExportError::Unsupported)
    }

    /// Path of the loaded model document, used to name exported files
    fn document_path(&self) -> Option<&Path> {
        None
    }
}
