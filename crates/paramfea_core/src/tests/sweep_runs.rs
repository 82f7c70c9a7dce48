//! Full sweeps: shape of the results table and the orchestrator surface

use super::mock_engine::{Call, MockEngine};
use super::{engine, two_by_three};
use crate::config::{OutputDefinition, RunOptions, SweepBuilder};
use crate::error::ConfigurationError;
use crate::model::{ParamValue, RunStatus, Target};
use crate::reduction::Reduction;
use crate::sweep::{SweepOrchestrator, SweepState};

fn numbers(values: &[ParamValue]) -> Vec<f64> {
    values.iter().filter_map(ParamValue::as_f64).collect()
}

#[test]
fn test_one_row_per_combination_in_order() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();

    let table = sweep.run(&mut engine, &RunOptions::default()).unwrap();

    assert_eq!(table.len(), 6);
    assert_eq!(table.expected_rows(), 6);
    assert!(table.is_frozen());
    assert!(!table.is_truncated());
    let order: Vec<Vec<f64>> = table
        .iter()
        .map(|row| numbers(&row.combination().values))
        .collect();
    assert_eq!(
        order,
        vec![
            vec![1.0, 10.0],
            vec![1.0, 20.0],
            vec![1.0, 30.0],
            vec![2.0, 10.0],
            vec![2.0, 20.0],
            vec![2.0, 30.0],
        ]
    );
    assert!(table.iter().all(|row| row.status() == RunStatus::Ok));
    assert_eq!(engine.solve_count(), 6);
    assert_eq!(sweep.state(), SweepState::Completed);
}

#[test]
fn test_default_outputs_are_peak_stress_and_displacement() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();

    let table = sweep.run(&mut engine, &RunOptions::default()).unwrap();

    assert_eq!(
        table.output_labels(),
        &["max(vonMises)".to_string(), "max(DisplacementLengths)".to_string()]
    );
    // Mock stress field peaks at 2 * (x + y)
    let stress = table.output_column("max(vonMises)").unwrap();
    assert_eq!(
        stress,
        vec![Some(22.0), Some(42.0), Some(62.0), Some(24.0), Some(44.0), Some(64.0)]
    );
    let first = table.row(0).unwrap();
    assert!((first.output("max(DisplacementLengths)").unwrap() - 0.11).abs() < 1e-12);
    assert!(first.solve_seconds().is_some());
    assert!(first.error_detail().is_none());
}

#[test]
fn test_labeled_max_output() {
    let config = SweepBuilder::new()
        .variable("A", "x", [1])
        .output(OutputDefinition::new("stress", Reduction::max()).with_label("max_stress"))
        .build()
        .unwrap();
    let mut sweep = SweepOrchestrator::new(config);
    let mut engine = MockEngine::with_properties(&[("A", "x")]);

    let table = sweep.run(&mut engine, &RunOptions::default()).unwrap();

    assert_eq!(table.row(0).unwrap().output("max_stress"), Some(12.0));
}

#[test]
fn test_every_combination_assigns_every_variable_then_recomputes() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();

    sweep.run(&mut engine, &RunOptions::default()).unwrap();

    let first_run = &engine.calls[..4];
    assert_eq!(
        first_run,
        &[
            Call::Set(Target::new("A", "x"), ParamValue::Number(1.0)),
            Call::Set(Target::new("B", "y"), ParamValue::Number(10.0)),
            Call::Recompute(Target::new("B", "y")),
            Call::Solve,
        ]
    );
}

#[test]
fn test_configuration_error_aborts_before_any_engine_call() {
    let config = SweepBuilder::new().variable("A", "x", [1, 2]).build().unwrap();
    let mut sweep = SweepOrchestrator::new(config);
    sweep.set_variables(Vec::new());
    let mut engine = engine();

    let err = sweep.run(&mut engine, &RunOptions::default()).unwrap_err();

    assert_eq!(err, ConfigurationError::EmptyParameterSpace);
    assert_eq!(sweep.state(), SweepState::Aborted);
    assert!(sweep.state().is_terminal());
    assert!(engine.calls.is_empty());
}

#[test]
fn test_set_outputs_empty_restores_defaults() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    sweep.set_outputs(vec![OutputDefinition::new("stress", Reduction::mean())]);
    assert_eq!(sweep.config().output_labels(), vec!["mean(stress)"]);

    sweep.set_outputs(Vec::new());
    assert_eq!(
        sweep.config().output_labels(),
        vec!["max(vonMises)", "max(DisplacementLengths)"]
    );
}

#[test]
fn test_setup_solver_is_validated() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    sweep.setup_solver("CCX_Results", "  ");
    let mut engine = engine();

    assert_eq!(
        sweep.run(&mut engine, &RunOptions::default()).unwrap_err(),
        ConfigurationError::EmptySolverName
    );
}

#[test]
fn test_each_sweep_gets_a_fresh_table() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();

    let first = sweep.run(&mut engine, &RunOptions::default()).unwrap();
    let second = sweep.run(&mut engine, &RunOptions::default()).unwrap();

    assert_eq!(first.len(), 6);
    assert_eq!(second.len(), 6);
    assert_eq!(
        first.output_column("max(vonMises)"),
        second.output_column("max(vonMises)")
    );
}

#[test]
fn test_limit_truncates_the_table() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();
    let options = RunOptions {
        limit: Some(4),
        ..RunOptions::default()
    };

    let table = sweep.run(&mut engine, &options).unwrap();

    assert_eq!(table.len(), 4);
    assert!(table.is_truncated());
    let summary = table.summary();
    assert_eq!(summary.total, 6);
    assert_eq!(summary.completed, 4);
    assert!(summary.truncated);
    assert_eq!(engine.solve_count(), 4);
}

#[test]
fn test_step_reports_progress() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let watcher = sweep.progress();
    let mut engine = engine().reject("B", "y", 30, "B.y out of range");
    let options = RunOptions::default();

    let mut run = sweep.begin(&mut engine, &options).unwrap();
    assert_eq!(run.progress().total(), 6);
    assert_eq!(run.remaining(), 6);

    let mut seen = Vec::new();
    while let Some(row) = run.step() {
        seen.push(row.index());
    }
    assert_eq!(seen, (0..6).collect::<Vec<_>>());
    assert_eq!(run.table().len(), 6);
    assert_eq!(run.state(), SweepState::Recording);
    assert!(!run.state().is_terminal());

    let table = run.finish();
    assert_eq!(table.failure_count(), 2);
    assert_eq!(watcher.completed(), 6);
    assert_eq!(watcher.failed(), 2);
    assert!((watcher.fraction() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_finishing_early_yields_a_truncated_table() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine();
    let options = RunOptions::default();

    let mut run = sweep.begin(&mut engine, &options).unwrap();
    run.step();
    run.step();
    let table = run.finish();

    assert_eq!(table.len(), 2);
    assert!(table.is_truncated());
    assert_eq!(sweep.state(), SweepState::Completed);
    assert!(sweep.state().is_terminal());
}

#[test]
fn test_material_names_are_assigned_as_text() {
    let config = SweepBuilder::new()
        .variable("MaterialSolid", "Material", ["Aluminium-Generic", "Steel-Generic"])
        .linspace("Shell", "Thickness", 10.0, 20.0, 3)
        .build()
        .unwrap();
    let mut sweep = SweepOrchestrator::new(config);
    let mut engine = MockEngine::with_properties(&[("MaterialSolid", "Material"), ("Shell", "Thickness")]);

    let table = sweep.run(&mut engine, &RunOptions::default()).unwrap();

    assert_eq!(table.len(), 6);
    assert_eq!(
        table.row(3).unwrap().combination().values,
        vec![ParamValue::from("Steel-Generic"), ParamValue::Number(10.0)]
    );
    assert!(table.iter().all(|row| row.is_ok()));
}
