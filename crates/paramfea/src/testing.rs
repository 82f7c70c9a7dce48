//! Fixture tables produced by a small in-memory engine

use std::collections::HashMap;

use paramfea_core::config::{RunOptions, SweepBuilder};
use paramfea_core::error::{MutationError, SolveError};
use paramfea_core::model::{ParamValue, ResultsTable, Target};
use paramfea_core::{FeaEngine, SweepOrchestrator};

/// Stress peaks at `2 * (x + y)`, displacement at `(x + y) / 100`.
/// Rejects `B.y = 30`.
#[derive(Default)]
pub struct FixtureEngine {
    values: HashMap<Target, f64>,
}

impl FeaEngine for FixtureEngine {
    type Solved = f64;

    fn set(&mut self, target: &Target, value: &ParamValue) -> Result<(), MutationError> {
        let value = value
            .as_f64()
            .ok_or_else(|| MutationError::rejected(target.clone(), "expected a number"))?;
        if target.label() == "B.y" && value > 25.0 {
            return Err(MutationError::rejected(
                target.clone(),
                "B.y out of range, max 25",
            ));
        }
        self.values.insert(target.clone(), value);
        Ok(())
    }

    fn solve(&mut self, _results_name: &str, _solver_name: &str) -> Result<f64, SolveError> {
        Ok(self.values.values().sum())
    }

    fn read_field(&self, solved: &f64, field: &str) -> Option<Vec<f64>> {
        match field {
            "vonMises" => Some(vec![*solved, 2.0 * solved]),
            "DisplacementLengths" => Some(vec![0.0, solved / 100.0]),
            _ => None,
        }
    }
}

fn run(options: &RunOptions) -> ResultsTable {
    let config = SweepBuilder::new()
        .variable("A", "x", [1, 2])
        .variable("B", "y", [10, 20, 30])
        .build()
        .unwrap();
    SweepOrchestrator::new(config)
        .run(&mut FixtureEngine::default(), options)
        .unwrap()
}

/// Six rows, rows 2 and 5 failed at mutation
pub fn sample_table() -> ResultsTable {
    run(&RunOptions::default())
}

/// Same space as [`sample_table`], not solved or verified
pub fn sample_dry_run() -> ResultsTable {
    run(&RunOptions {
        verify_mutations: false,
        ..RunOptions::dry_run()
    })
}
