//! Sweep orchestrator - drives every combination through mutate, solve and extract.
//!
//! The engine holds a single document and solver state, so combinations are
//! processed strictly one after another:
//!
//! ```text
//! Idle -> Enumerating -> (Mutating -> Solving -> Extracting -> Recording) x N -> Completed
//! ```
//!
//! A configuration error before the first combination moves the sweep to
//! `Aborted`. Nothing that happens inside one combination does: its failure
//! is recorded in that combination's row and the loop moves on, so a sweep
//! always yields exactly one row per combination, in enumeration order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, debug_span, error, info, warn};

use crate::config::{OutputDefinition, RunOptions, SweepConfig, VariableDefinition};
use crate::engine::FeaEngine;
use crate::error::{ConfigurationError, RunError};
use crate::model::{ParameterCombination, ResultsTable, RunResult};

use super::enumerator::{Combinations, ParameterSpace};
use super::extract::Extractor;
use super::mutator::ModelMutator;
use super::solve::SolveInvoker;

/// Progress tracking for a running sweep
///
/// Cheap to clone; clones share the same counters, so another thread can
/// watch a sweep that blocks the current one.
#[derive(Debug, Clone)]
pub struct SweepProgress {
    /// Combinations processed so far
    completed: Arc<AtomicUsize>,
    /// Combinations planned for this sweep
    total: Arc<AtomicUsize>,
    /// Combinations recorded as failed so far
    failed: Arc<AtomicUsize>,
}

impl SweepProgress {
    /// Create a new progress tracker
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            failed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of processed combinations
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get the number of planned combinations
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Get the number of failed combinations so far
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Fraction done, in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            1.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    /// Count one processed combination
    pub fn record(&self, failed: bool) {
        if failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the progress
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }
}

impl Default for SweepProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Where the orchestrator is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    Enumerating,
    Mutating,
    Solving,
    Extracting,
    Recording,
    Completed,
    Aborted,
}

impl SweepState {
    /// `Completed` or `Aborted`
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SweepState::Completed | SweepState::Aborted)
    }
}

/// Naming scheme for per-run field exports: `<folder>/FEA_<stem>_<index>.vtu`
#[derive(Debug, Clone, PartialEq)]
struct FieldExport {
    folder: PathBuf,
    stem: String,
    /// Zero-padding so file names sort in run order
    width: usize,
}

impl FieldExport {
    fn resolve(
        output_folder: Option<&Path>,
        document: Option<&Path>,
        total: usize,
    ) -> Result<Self, ConfigurationError> {
        let folder = match (output_folder, document.and_then(Path::parent)) {
            (Some(folder), _) => folder.to_path_buf(),
            (None, Some(parent)) => parent.to_path_buf(),
            (None, None) => return Err(ConfigurationError::MissingOutputFolder),
        };
        let stem = document
            .and_then(Path::file_stem)
            .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().into_owned());
        Ok(Self {
            folder,
            stem,
            width: digits(total),
        })
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.folder.join(format!(
            "FEA_{}_{:0width$}.vtu",
            self.stem,
            index,
            width = self.width
        ))
    }
}

/// Decimal digits needed to print `n`
fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Owns a sweep configuration and runs sweeps over it.
///
/// # Example
///
/// ```ignore
/// let mut sweep = SweepOrchestrator::new(SweepBuilder::new()
///     .linspace("Sketch", "HoleDiam", 10.0, 30.0, 3)
///     .build()?);
/// let table = sweep.run(&mut engine, &RunOptions::default())?;
/// println!("{}", table.summary());
/// ```
#[derive(Debug)]
pub struct SweepOrchestrator {
    config: SweepConfig,
    state: SweepState,
    progress: SweepProgress,
}

impl SweepOrchestrator {
    #[must_use]
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            state: SweepState::Idle,
            progress: SweepProgress::default(),
        }
    }

    // =========================================================================
    // Configuration surface
    // =========================================================================

    pub fn set_variables(&mut self, variables: Vec<VariableDefinition>) {
        self.config.variables = variables;
    }

    /// Replace the output set; an empty list restores the built-in defaults
    pub fn set_outputs(&mut self, outputs: Vec<OutputDefinition>) {
        self.config.outputs = if outputs.is_empty() {
            OutputDefinition::defaults()
        } else {
            outputs
        };
        debug!(outputs = ?self.config.output_labels(), "Analysis outputs set");
    }

    pub fn setup_solver(&mut self, results_name: impl Into<String>, solver_name: impl Into<String>) {
        self.config.solver.results_name = results_name.into();
        self.config.solver.solver_name = solver_name.into();
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Handle on the live counters of the current (or last) sweep
    pub fn progress(&self) -> SweepProgress {
        self.progress.clone()
    }

    // =========================================================================
    // Running
    // =========================================================================

    /// Run a full sweep and return its frozen results table.
    ///
    /// Only configuration errors are returned; per-combination failures end
    /// up in the table.
    pub fn run<E: FeaEngine>(
        &mut self,
        engine: &mut E,
        options: &RunOptions,
    ) -> Result<ResultsTable, ConfigurationError> {
        let mut run = self.begin(engine, options)?;
        while run.step().is_some() {}
        Ok(run.finish())
    }

    /// Validate the configuration and prepare a sweep that is advanced one
    /// combination at a time with [`SweepRun::step`].
    pub fn begin<'s, E: FeaEngine>(
        &'s mut self,
        engine: &'s mut E,
        options: &RunOptions,
    ) -> Result<SweepRun<'s, E>, ConfigurationError> {
        let Self {
            config,
            state,
            progress,
        } = self;
        let config: &'s SweepConfig = config;
        *state = SweepState::Idle;

        let prepared = prepare(config, &*engine, options);
        let (space, export) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                *state = SweepState::Aborted;
                error!(error = %e, "Sweep aborted before the first combination");
                return Err(e);
            }
        };
        *state = SweepState::Enumerating;

        let total = space.len();
        let planned = options.limit.map_or(total, |limit| limit.min(total));
        let touches_model = !options.dry_run || options.verify_mutations;

        let mut mutator = ModelMutator::new(&config.variables);
        if options.restore_baseline && touches_model {
            mutator.snapshot(&*engine);
        }

        let table = ResultsTable::new(
            config.parameter_labels(),
            config.output_labels(),
            total,
            options.dry_run,
        );
        progress.reset(planned);

        info!(
            combinations = total,
            planned,
            dry_run = options.dry_run,
            solver = %config.solver.solver_name,
            "Starting parameter sweep"
        );

        Ok(SweepRun {
            engine,
            combinations: space.combinations(),
            mutator,
            invoker: SolveInvoker::new(&config.solver, options.max_solve_attempts),
            extractor: Extractor::new(&config.outputs),
            table,
            progress: progress.clone(),
            state,
            planned,
            dry_run: options.dry_run,
            verify_mutations: options.verify_mutations,
            restore_baseline: options.restore_baseline && touches_model,
            export,
        })
    }
}

fn prepare<'a, E: FeaEngine>(
    config: &'a SweepConfig,
    engine: &E,
    options: &RunOptions,
) -> Result<(ParameterSpace<'a>, Option<FieldExport>), ConfigurationError> {
    config.validate()?;
    let space = ParameterSpace::new(&config.variables)?;
    let export = if options.export_results && !options.dry_run {
        Some(FieldExport::resolve(
            options.output_folder.as_deref(),
            engine.document_path(),
            space.len(),
        )?)
    } else {
        None
    };
    Ok((space, export))
}

/// A sweep in progress.
///
/// Holds the engine exclusively until [`finish`](SweepRun::finish) is called.
pub struct SweepRun<'s, E: FeaEngine> {
    engine: &'s mut E,
    combinations: Combinations<'s>,
    mutator: ModelMutator<'s>,
    invoker: SolveInvoker<'s>,
    extractor: Extractor<'s>,
    table: ResultsTable,
    progress: SweepProgress,
    state: &'s mut SweepState,
    planned: usize,
    dry_run: bool,
    verify_mutations: bool,
    restore_baseline: bool,
    export: Option<FieldExport>,
}

impl<E: FeaEngine> SweepRun<'_, E> {
    /// Process the next combination and return its recorded row, or `None`
    /// once every planned combination has been processed.
    pub fn step(&mut self) -> Option<&RunResult> {
        if self.table.len() >= self.planned {
            return None;
        }
        let combination = self.combinations.next()?;
        let index = combination.index;
        let _span = debug_span!("combination", index).entered();

        let result = self.process(combination);

        *self.state = SweepState::Recording;
        let failed = !result.is_ok();
        self.table.push(result);
        self.progress.record(failed);
        debug!(
            completed = self.progress.completed(),
            total = self.planned,
            "Combination recorded"
        );
        self.table.rows().last()
    }

    fn process(&mut self, combination: ParameterCombination) -> RunResult {
        let index = combination.index;

        if !self.dry_run || self.verify_mutations {
            *self.state = SweepState::Mutating;
            if let Err(e) = self.mutator.apply(&mut *self.engine, &combination) {
                warn!(index, target = %e.target, error = %e, "Model mutation failed");
                return RunResult::failed(combination, &RunError::from(e), None);
            }
        }

        if self.dry_run {
            return RunResult::planned(combination);
        }

        *self.state = SweepState::Solving;
        let outcome = match self.invoker.invoke(&mut *self.engine) {
            Ok(outcome) => outcome,
            Err((e, seconds)) => {
                warn!(index, error = %e, "Test case exited with solver error");
                return RunResult::failed(combination, &RunError::from(e), Some(seconds));
            }
        };
        info!(index, seconds = outcome.seconds, "FEA test case solved");

        *self.state = SweepState::Extracting;
        let outputs = match self.extractor.extract(&*self.engine, &outcome.solved) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!(index, error = %e, "Result extraction failed");
                return RunResult::failed(combination, &RunError::from(e), Some(outcome.seconds));
            }
        };

        let result = RunResult::succeeded(combination, outputs, outcome.seconds);
        match &self.export {
            Some(export) => {
                let path = export.path_for(index);
                match self.engine.export_fields(&outcome.solved, &path) {
                    Ok(()) => {
                        debug!(index, path = %path.display(), "Exported solved fields");
                        result
                    }
                    Err(e) => {
                        warn!(index, error = %e, "Field export failed");
                        result.with_warning(format!("field export failed: {e}"))
                    }
                }
            }
            None => result,
        }
    }

    /// Read-only view of the rows recorded so far
    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    pub fn state(&self) -> SweepState {
        *self.state
    }

    pub fn progress(&self) -> &SweepProgress {
        &self.progress
    }

    /// Combinations still to process
    pub fn remaining(&self) -> usize {
        self.planned - self.table.len()
    }

    /// End the sweep: restore the model's baseline values and freeze the
    /// table. Calling this before every combination ran yields a truncated table.
    pub fn finish(mut self) -> ResultsTable {
        if self.restore_baseline {
            let restored = self.mutator.restore(&mut *self.engine);
            debug!(restored, "Restored baseline property values");
        }
        self.table.freeze();
        *self.state = SweepState::Completed;

        let summary = self.table.summary();
        info!(
            completed = summary.completed,
            total = summary.total,
            failed = summary.failed,
            elapsed_seconds = summary.elapsed_seconds,
            "Parameter sweep completed"
        );
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts() {
        let progress = SweepProgress::new(4);
        let watcher = progress.clone();
        progress.record(false);
        progress.record(true);
        assert_eq!(watcher.completed(), 2);
        assert_eq!(watcher.failed(), 1);
        assert!((watcher.fraction() - 0.5).abs() < f64::EPSILON);

        progress.reset(10);
        assert_eq!(watcher.completed(), 0);
        assert_eq!(watcher.total(), 10);
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(12), 2);
        assert_eq!(digits(100), 3);
    }

    #[test]
    fn test_field_export_paths() {
        let export = FieldExport::resolve(None, Some(Path::new("/models/shell_test.FCStd")), 12)
            .unwrap();
        assert_eq!(
            export.path_for(3),
            PathBuf::from("/models/FEA_shell_test_03.vtu")
        );

        let export =
            FieldExport::resolve(Some(Path::new("/tmp/out")), Some(Path::new("plate.FCStd")), 5)
                .unwrap();
        assert_eq!(export.path_for(4), PathBuf::from("/tmp/out/FEA_plate_4.vtu"));
    }

    #[test]
    fn test_field_export_needs_a_folder() {
        assert_eq!(
            FieldExport::resolve(None, None, 3),
            Err(ConfigurationError::MissingOutputFolder)
        );
    }
}
