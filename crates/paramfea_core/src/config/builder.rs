//! Sweep Builder
//!
//! Fluent API for assembling a `SweepConfig`. Definition errors (such as an
//! empty value list) are held until `build`, which reports the first one and
//! then runs the full configuration validation.

use super::outputs::OutputDefinition;
use super::variables::VariableDefinition;
use super::{SolverSettings, SweepConfig};
use crate::error::ConfigurationError;
use crate::model::ParamValue;

/// Builder for sweep configurations
pub struct SweepBuilder {
    variables: Vec<VariableDefinition>,
    outputs: Vec<OutputDefinition>,
    solver: SolverSettings,
    first_error: Option<ConfigurationError>,
}

impl Default for SweepBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            outputs: Vec::new(),
            solver: SolverSettings::default(),
            first_error: None,
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// Sweep `object.property` over explicit values
    #[must_use]
    pub fn variable<V>(
        self,
        object: impl Into<String>,
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self
    where
        V: Into<ParamValue>,
    {
        let def = VariableDefinition::new(object, property, values);
        self.push_variable(def)
    }

    /// Sweep `object.property` over `num` evenly spaced values
    #[must_use]
    pub fn linspace(
        self,
        object: impl Into<String>,
        property: impl Into<String>,
        start: f64,
        stop: f64,
        num: usize,
    ) -> Self {
        let def = VariableDefinition::linspace(object, property, start, stop, num);
        self.push_variable(def)
    }

    /// Add an already-constructed definition
    #[must_use]
    pub fn definition(mut self, def: VariableDefinition) -> Self {
        self.variables.push(def);
        self
    }

    fn push_variable(mut self, def: Result<VariableDefinition, ConfigurationError>) -> Self {
        match def {
            Ok(def) => self.variables.push(def),
            Err(e) => {
                self.first_error.get_or_insert(e);
            }
        }
        self
    }

    // =========================================================================
    // Outputs and solver
    // =========================================================================

    #[must_use]
    pub fn output(mut self, output: OutputDefinition) -> Self {
        self.outputs.push(output);
        self
    }

    #[must_use]
    pub fn outputs(mut self, outputs: impl IntoIterator<Item = OutputDefinition>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    #[must_use]
    pub fn solver(mut self, results_name: impl Into<String>, solver_name: impl Into<String>) -> Self {
        self.solver = SolverSettings {
            results_name: results_name.into(),
            solver_name: solver_name.into(),
        };
        self
    }

    /// Finish the configuration.
    ///
    /// With no outputs declared the built-in pair (`max(vonMises)`,
    /// `max(DisplacementLengths)`) is used.
    pub fn build(self) -> Result<SweepConfig, ConfigurationError> {
        if let Some(err) = self.first_error {
            return Err(err);
        }
        let outputs = if self.outputs.is_empty() {
            OutputDefinition::defaults()
        } else {
            self.outputs
        };
        let config = SweepConfig {
            variables: self.variables,
            outputs,
            solver: self.solver,
        };
        config.validate()?;
        Ok(config)
    }
}
