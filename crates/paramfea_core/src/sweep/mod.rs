//! Sweep execution
//!
//! - `enumerator` - lazy cartesian product of the variable value lists
//! - `mutator` - writes a combination onto the live model
//! - `solve` - triggers and times the external solve
//! - `extract` - reduces solved fields to scalar outputs
//! - `orchestrator` - drives the per-combination state machine

pub mod enumerator;
pub mod extract;
pub mod mutator;
pub mod orchestrator;
pub mod solve;

pub use enumerator::{Combinations, ParameterSpace};
pub use extract::Extractor;
pub use mutator::ModelMutator;
pub use orchestrator::{SweepOrchestrator, SweepProgress, SweepRun, SweepState};
pub use solve::{SolveInvoker, SolveOutcome};
