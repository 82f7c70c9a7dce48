//! Engine stand-in for previewing a sweep without a model.
//!
//! Only usable for dry runs with mutation verification off; anything that
//! would reach a real model fails.

use std::path::{Path, PathBuf};

use paramfea_core::config::RunOptions;
use paramfea_core::error::{MutationError, SolveError, SolveErrorKind};
use paramfea_core::model::{ParamValue, Target};
use paramfea_core::FeaEngine;

#[derive(Debug, Default)]
pub struct PreviewEngine {
    document: Option<PathBuf>,
}

impl PreviewEngine {
    pub fn new(document: Option<PathBuf>) -> Self {
        Self { document }
    }

    /// Turn the given options into a preview: dry run, no model access
    pub fn options(base: &RunOptions) -> RunOptions {
        RunOptions {
            dry_run: true,
            verify_mutations: false,
            export_results: false,
            restore_baseline: false,
            ..base.clone()
        }
    }
}

impl FeaEngine for PreviewEngine {
    type Solved = ();

    fn set(&mut self, target: &Target, _value: &ParamValue) -> Result<(), MutationError> {
        Err(MutationError::rejected(
            target.clone(),
            "no model loaded in preview mode",
        ))
    }

    fn solve(&mut self, _results_name: &str, _solver_name: &str) -> Result<(), SolveError> {
        Err(SolveError::new(
            SolveErrorKind::MissingObject,
            "no solver available in preview mode",
        ))
    }

    fn read_field(&self, _solved: &(), _field: &str) -> Option<Vec<f64>> {
        None
    }

    fn document_path(&self) -> Option<&Path> {
        self.document.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramfea_core::{SweepBuilder, SweepOrchestrator};

    #[test]
    fn test_preview_plans_every_combination() {
        let config = SweepBuilder::new()
            .linspace("Sketch", "HoleDiam", 10.0, 30.0, 3)
            .variable("MaterialSolid", "Material", ["Aluminium-Generic", "Steel-Generic"])
            .build()
            .unwrap();
        let base = RunOptions {
            export_results: true,
            limit: Some(5),
            ..RunOptions::default()
        };

        let table = SweepOrchestrator::new(config)
            .run(&mut PreviewEngine::default(), &PreviewEngine::options(&base))
            .unwrap();

        assert_eq!(table.len(), 5);
        assert!(table.is_dry_run());
        assert_eq!(table.failure_count(), 0);
    }
}
