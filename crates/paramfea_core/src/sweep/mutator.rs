//! Applies parameter combinations to the live model.

use tracing::{debug, warn};

use crate::config::VariableDefinition;
use crate::engine::FeaEngine;
use crate::error::MutationError;
use crate::model::{ParamValue, ParameterCombination, Target};

/// Writes every variable of a combination onto the model.
///
/// Each call assigns *all* swept properties, so whatever a previous (possibly
/// half-applied) combination left behind is overwritten before the next
/// solve. The model therefore reflects exactly one combination at a time.
#[derive(Debug)]
pub struct ModelMutator<'a> {
    variables: &'a [VariableDefinition],
    /// Property values found before the sweep touched the model
    baseline: Vec<(Target, ParamValue)>,
}

impl<'a> ModelMutator<'a> {
    pub fn new(variables: &'a [VariableDefinition]) -> Self {
        Self {
            variables,
            baseline: Vec::new(),
        }
    }

    /// Record the current value of every swept property the engine can report
    pub fn snapshot<E: FeaEngine>(&mut self, engine: &E) {
        self.baseline = self
            .variables
            .iter()
            .filter_map(|var| {
                engine
                    .get(var.target())
                    .map(|value| (var.target().clone(), value))
            })
            .collect();
        debug!(
            captured = self.baseline.len(),
            swept = self.variables.len(),
            "Captured baseline property values"
        );
    }

    /// Apply `combination` in declaration order, then recompute the model.
    ///
    /// Stops at the first rejected assignment; the error names its target.
    pub fn apply<E: FeaEngine>(
        &self,
        engine: &mut E,
        combination: &ParameterCombination,
    ) -> Result<(), MutationError> {
        debug_assert_eq!(combination.ndim(), self.variables.len());

        let mut last = None;
        for (var, value) in self.variables.iter().zip(&combination.values) {
            engine.set(var.target(), value)?;
            last = Some(var.target());
        }
        if let Some(last) = last {
            engine.recompute(last)?;
        }
        Ok(())
    }

    /// Write the baseline values back. Failures are logged, not returned.
    pub fn restore<E: FeaEngine>(&self, engine: &mut E) -> usize {
        let mut restored = 0;
        for (target, value) in &self.baseline {
            match engine.set(target, value) {
                Ok(()) => restored += 1,
                Err(e) => warn!(%target, error = %e, "Could not restore baseline value"),
            }
        }
        if let Some((last, _)) = self.baseline.last() {
            if let Err(e) = engine.recompute(last) {
                warn!(error = %e, "Recompute after restoring baseline failed");
            }
        }
        restored
    }

    pub fn baseline(&self) -> &[(Target, ParamValue)] {
        &self.baseline
    }
}
