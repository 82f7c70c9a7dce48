use std::time::Instant;

use tracing::{debug, warn};

use crate::config::SolverSettings;
use crate::engine::FeaEngine;
use crate::error::SolveError;

/// A successful solve and how long it took
#[derive(Debug)]
pub struct SolveOutcome<S> {
    pub solved: S,
    /// Wall-clock time of the successful attempt
    pub seconds: f64,
    pub attempts: u32,
}

/// Triggers the external solve for the current model state
#[derive(Debug, Clone)]
pub struct SolveInvoker<'a> {
    settings: &'a SolverSettings,
    max_attempts: u32,
}

impl<'a> SolveInvoker<'a> {
    /// `max_attempts` below 1 is treated as 1
    pub fn new(settings: &'a SolverSettings, max_attempts: u32) -> Self {
        Self {
            settings,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Solve, blocking until the engine reports completion or failure.
    ///
    /// Retries only when configured with more than one attempt; the error of
    /// the last attempt is returned along with the time it consumed.
    pub fn invoke<E: FeaEngine>(
        &self,
        engine: &mut E,
    ) -> Result<SolveOutcome<E::Solved>, (SolveError, f64)> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let start = Instant::now();
            let result = engine.solve(&self.settings.results_name, &self.settings.solver_name);
            let seconds = start.elapsed().as_secs_f64();

            match result {
                Ok(solved) => {
                    debug!(seconds, attempt, "Solve finished");
                    return Ok(SolveOutcome {
                        solved,
                        seconds,
                        attempts: attempt,
                    });
                }
                Err(e) if attempt < self.max_attempts => {
                    warn!(attempt, error = %e, "Solve failed, retrying");
                }
                Err(e) => return Err((e, seconds)),
            }
        }
    }
}
