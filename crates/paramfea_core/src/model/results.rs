//! Sweep results
//!
//! One `RunResult` per parameter combination, accumulated in enumeration
//! order into a `ResultsTable`. The table only grows while its sweep runs and
//! is frozen when the sweep finishes; nothing outside the orchestrator can
//! add or change rows.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::combination::ParameterCombination;
use super::value::ParamValue;
use crate::error::RunError;

/// Column carrying the run status
pub const STATUS_COLUMN: &str = "status";
/// Column carrying the failure or warning message
pub const ERROR_DETAIL_COLUMN: &str = "error_detail";
/// Column carrying the solve wall-clock time
pub const SOLVE_SECONDS_COLUMN: &str = "solve_seconds";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Ok,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Ok => f.write_str("ok"),
            RunStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Stage of a combination's processing that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Mutation,
    Solve,
    Extraction,
}

impl From<&RunError> for RunPhase {
    fn from(err: &RunError) -> Self {
        match err {
            RunError::Mutation(_) => RunPhase::Mutation,
            RunError::Solve(_) => RunPhase::Solve,
            RunError::Extraction(_) => RunPhase::Extraction,
        }
    }
}

/// Outcome of one parameter combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    combination: ParameterCombination,
    status: RunStatus,
    /// `(label, value)` in output declaration order; empty unless solved successfully
    outputs: Vec<(String, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_phase: Option<RunPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solve_seconds: Option<f64>,
}

impl RunResult {
    pub(crate) fn succeeded(
        combination: ParameterCombination,
        outputs: Vec<(String, f64)>,
        solve_seconds: f64,
    ) -> Self {
        Self {
            combination,
            status: RunStatus::Ok,
            outputs,
            error_detail: None,
            failed_phase: None,
            solve_seconds: Some(solve_seconds),
        }
    }

    /// A dry-run row: the combination was recorded (and possibly verified) but not solved
    pub(crate) fn planned(combination: ParameterCombination) -> Self {
        Self {
            combination,
            status: RunStatus::Ok,
            outputs: Vec::new(),
            error_detail: None,
            failed_phase: None,
            solve_seconds: None,
        }
    }

    pub(crate) fn failed(
        combination: ParameterCombination,
        error: &RunError,
        solve_seconds: Option<f64>,
    ) -> Self {
        Self {
            combination,
            status: RunStatus::Failed,
            outputs: Vec::new(),
            error_detail: Some(error.to_string()),
            failed_phase: Some(RunPhase::from(error)),
            solve_seconds,
        }
    }

    /// Attach a non-fatal message (e.g. a failed field export) to a successful run
    pub(crate) fn with_warning(mut self, message: String) -> Self {
        self.error_detail = Some(message);
        self
    }

    pub fn combination(&self) -> &ParameterCombination {
        &self.combination
    }

    pub fn index(&self) -> usize {
        self.combination.index
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }

    pub fn outputs(&self) -> &[(String, f64)] {
        &self.outputs
    }

    /// Output value by column label
    pub fn output(&self, label: &str) -> Option<f64> {
        self.outputs
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn failed_phase(&self) -> Option<RunPhase> {
        self.failed_phase
    }

    pub fn solve_seconds(&self) -> Option<f64> {
        self.solve_seconds
    }
}

/// A single cell of the exported tabular form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&ParamValue> for Cell {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Number(v) => Cell::Number(*v),
            ParamValue::Text(s) => Cell::Text(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Row/column representation of a results table for export and plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TabularData {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Keep only the named columns, in the order given.
    ///
    /// Returns `None` if any name is unknown.
    pub fn project(&self, names: &[&str]) -> Option<TabularData> {
        let lookup: FxHashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let indices = names
            .iter()
            .map(|n| lookup.get(n).copied())
            .collect::<Option<Vec<_>>>()?;

        Some(TabularData {
            columns: names.iter().map(|n| (*n).to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Rows as `(column, cell)` pairs, one map per row
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &Cell)>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Failure counts and timing for a finished sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    /// Size of the parameter space
    pub total: usize,
    /// Rows recorded
    pub completed: usize,
    pub ok: usize,
    pub failed: usize,
    /// True if the sweep stopped before covering the parameter space
    pub truncated: bool,
    pub dry_run: bool,
    pub elapsed_seconds: f64,
}

impl SweepSummary {
    /// Fraction of recorded runs that failed
    pub fn failure_rate(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.failed as f64 / self.completed as f64
        }
    }
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} combinations recorded, {} ok, {} failed",
            self.completed, self.total, self.ok, self.failed
        )?;
        if self.truncated {
            f.write_str(" (truncated)")?;
        }
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}

/// Ordered per-combination results of one sweep
#[derive(Debug, Clone, Serialize)]
pub struct ResultsTable {
    parameter_labels: Vec<String>,
    output_labels: Vec<String>,
    rows: Vec<RunResult>,
    /// Size of the parameter space
    expected_rows: usize,
    dry_run: bool,
    started_at: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<jiff::Timestamp>,
}

impl ResultsTable {
    pub(crate) fn new(
        parameter_labels: Vec<String>,
        output_labels: Vec<String>,
        expected_rows: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            parameter_labels,
            output_labels,
            rows: Vec::with_capacity(expected_rows.min(4096)),
            expected_rows,
            dry_run,
            started_at: jiff::Timestamp::now(),
            finished_at: None,
        }
    }

    /// Append the next row. Rows must arrive in enumeration order.
    pub(crate) fn push(&mut self, row: RunResult) {
        debug_assert!(self.finished_at.is_none(), "push into a frozen table");
        debug_assert_eq!(row.index(), self.rows.len(), "row out of order");
        self.rows.push(row);
    }

    pub(crate) fn freeze(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(jiff::Timestamp::now());
        }
    }

    /// True once the owning sweep has finished
    pub fn is_frozen(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn parameter_labels(&self) -> &[String] {
        &self.parameter_labels
    }

    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    pub fn rows(&self) -> &[RunResult] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RunResult> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunResult> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Size of the parameter space this table was created for
    pub fn expected_rows(&self) -> usize {
        self.expected_rows
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Frozen with fewer rows than the parameter space holds
    pub fn is_truncated(&self) -> bool {
        self.is_frozen() && self.rows.len() < self.expected_rows
    }

    pub fn started_at(&self) -> jiff::Timestamp {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<jiff::Timestamp> {
        self.finished_at
    }

    /// Rows with the given status, in enumeration order
    pub fn filter_status(&self, status: RunStatus) -> impl Iterator<Item = &RunResult> {
        self.rows.iter().filter(move |r| r.status() == status)
    }

    pub fn failed(&self) -> impl Iterator<Item = &RunResult> {
        self.filter_status(RunStatus::Failed)
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// All export columns: parameters, outputs, then status, error detail and solve time
    pub fn column_names(&self) -> Vec<String> {
        self.parameter_labels
            .iter()
            .chain(self.output_labels.iter())
            .cloned()
            .chain(
                [STATUS_COLUMN, ERROR_DETAIL_COLUMN, SOLVE_SECONDS_COLUMN]
                    .into_iter()
                    .map(String::from),
            )
            .collect()
    }

    fn row_cells(&self, row: &RunResult) -> Vec<Cell> {
        let mut cells: Vec<Cell> = row.combination().values.iter().map(Cell::from).collect();
        cells.extend(
            self.output_labels
                .iter()
                .map(|label| row.output(label).map_or(Cell::Empty, Cell::Number)),
        );
        cells.push(Cell::Text(row.status().to_string()));
        cells.push(
            row.error_detail()
                .map_or(Cell::Empty, |d| Cell::Text(d.to_string())),
        );
        cells.push(row.solve_seconds().map_or(Cell::Empty, Cell::Number));
        cells
    }

    /// Convert to the row/column form consumed by exporters
    pub fn to_tabular(&self) -> TabularData {
        TabularData {
            columns: self.column_names(),
            rows: self.rows.iter().map(|row| self.row_cells(row)).collect(),
        }
    }

    /// Tabular form restricted to rows with the given status
    pub fn to_tabular_with_status(&self, status: RunStatus) -> TabularData {
        TabularData {
            columns: self.column_names(),
            rows: self
                .filter_status(status)
                .map(|row| self.row_cells(row))
                .collect(),
        }
    }

    /// All cells of one column
    pub fn column(&self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_names().iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| self.row_cells(row).swap_remove(idx))
                .collect(),
        )
    }

    /// Values of one output column; `None` for rows without that output
    pub fn output_column(&self, label: &str) -> Option<Vec<Option<f64>>> {
        if !self.output_labels.iter().any(|l| l == label) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.output(label)).collect())
    }

    pub fn summary(&self) -> SweepSummary {
        let failed = self.failure_count();
        let elapsed_seconds = self
            .finished_at
            .unwrap_or_else(jiff::Timestamp::now)
            .duration_since(self.started_at)
            .as_secs_f64();
        SweepSummary {
            total: self.expected_rows,
            completed: self.rows.len(),
            ok: self.rows.len() - failed,
            failed,
            truncated: self.is_truncated(),
            dry_run: self.dry_run,
            elapsed_seconds,
        }
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = &'a RunResult;
    type IntoIter = std::slice::Iter<'a, RunResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
