//! Previewing the parameter matrix without solving

use super::mock_engine::Call;
use super::{engine, two_by_three};
use crate::config::RunOptions;
use crate::model::{Cell, RunStatus};
use crate::sweep::SweepOrchestrator;

#[test]
fn test_dry_run_matches_full_run_shape_without_solving() {
    let mut full_engine = engine();
    let full = SweepOrchestrator::new(two_by_three())
        .run(&mut full_engine, &RunOptions::default())
        .unwrap();

    let mut dry_engine = engine();
    let dry = SweepOrchestrator::new(two_by_three())
        .run(&mut dry_engine, &RunOptions::dry_run())
        .unwrap();

    assert_eq!(dry.len(), full.len());
    assert_eq!(dry.parameter_labels(), full.parameter_labels());
    assert!(dry.is_dry_run());
    assert_eq!(dry_engine.solve_count(), 0);
    for (dry_row, full_row) in dry.iter().zip(&full) {
        assert_eq!(dry_row.combination(), full_row.combination());
        assert_eq!(dry_row.status(), RunStatus::Ok);
        assert!(dry_row.outputs().is_empty());
        assert!(dry_row.solve_seconds().is_none());
    }
    assert_eq!(
        dry.column("max(vonMises)").unwrap(),
        vec![Cell::Empty; 6]
    );
}

#[test]
fn test_dry_run_verifies_mutations() {
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine().reject("B", "y", 20, "B.y out of range");

    let table = sweep.run(&mut engine, &RunOptions::dry_run()).unwrap();

    assert_eq!(table.len(), 6);
    assert_eq!(table.failure_count(), 2);
    assert_eq!(table.row(1).unwrap().error_detail(), Some("B.y out of range"));
    assert!(engine.calls.iter().any(|c| matches!(c, Call::Set(..))));
    assert_eq!(engine.solve_count(), 0);
}

#[test]
fn test_dry_run_without_verification_never_touches_the_model() {
    let options = RunOptions {
        verify_mutations: false,
        ..RunOptions::dry_run()
    };
    let mut sweep = SweepOrchestrator::new(two_by_three());
    let mut engine = engine().reject("B", "y", 20, "B.y out of range");

    let table = sweep.run(&mut engine, &options).unwrap();

    assert_eq!(table.len(), 6);
    assert_eq!(table.failure_count(), 0);
    assert!(engine.calls.is_empty());
}

#[test]
fn test_dry_run_ignores_export_settings() {
    let options = RunOptions {
        export_results: true,
        ..RunOptions::dry_run()
    };
    let mut sweep = SweepOrchestrator::new(two_by_three());
    // No document and no folder: a real run would refuse to start
    let mut engine = engine();

    let table = sweep.run(&mut engine, &options).unwrap();

    assert_eq!(table.len(), 6);
    assert!(engine.exported().is_empty());
}
