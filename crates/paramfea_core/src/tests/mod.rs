//! Sweep tests against a scripted engine
//!
//! Tests are organized by topic:
//! - `sweep_runs` - Row count, ordering, outputs and the step API
//! - `failure_isolation` - Mutation, solve and extraction failures stay in their row
//! - `dry_run` - Previewing the parameter matrix without solving
//! - `field_export` - Per-run field files and baseline restore

mod dry_run;
mod sweep_runs;

use crate::config::{SweepBuilder, SweepConfig};

/// `A.x in [1, 2]` and `B.y in [10, 20, 30]`, default outputs
pub(crate) fn two_by_three() -> SweepConfig {
    SweepBuilder::new()
        .variable("A", "x", [1, 2])
        .variable("B", "y", [10, 20, 30])
        .build()
        .unwrap()
}

pub(crate) fn engine() -> mock_engine::MockEngine {
    mock_engine::MockEngine::with_properties(&[("A", "x"), ("B", "y")])
}
