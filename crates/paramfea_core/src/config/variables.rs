//! Sweep variable declarations.

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::model::{ParamValue, Target};

/// Upper bound on the number of points a single `linspace` may generate
pub const MAX_LINSPACE_POINTS: usize = 100_000;

/// One sweepable model property and the values it takes.
///
/// Construction rejects an empty value list, so every definition that exists
/// contributes at least one point to the parameter space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDefinition {
    target: Target,
    values: Vec<ParamValue>,
}

impl VariableDefinition {
    /// Declare a variable over an explicit list of candidate values
    pub fn new<V>(
        object: impl Into<String>,
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, ConfigurationError>
    where
        V: Into<ParamValue>,
    {
        let target = Target::new(object, property);
        let values: Vec<ParamValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ConfigurationError::EmptyValues(target));
        }
        Ok(Self { target, values })
    }

    /// Declare a variable over `num` evenly spaced values from `start` to `stop` inclusive
    pub fn linspace(
        object: impl Into<String>,
        property: impl Into<String>,
        start: f64,
        stop: f64,
        num: usize,
    ) -> Result<Self, ConfigurationError> {
        let target = Target::new(object, property);
        if num == 0 {
            return Err(ConfigurationError::EmptyValues(target));
        }
        if num > MAX_LINSPACE_POINTS {
            return Err(ConfigurationError::InvalidRange {
                target,
                reason: "too many points (limit 100000)",
            });
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(ConfigurationError::InvalidRange {
                target,
                reason: "bounds must be finite",
            });
        }
        let values = linspace_values(start, stop, num)
            .into_iter()
            .map(ParamValue::Number)
            .collect();
        Ok(Self { target, values })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    /// Number of candidate values (always at least one)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column label, `object.property`
    pub fn label(&self) -> String {
        self.target.label()
    }
}

/// Evenly spaced values, endpoints included
fn linspace_values(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num == 1 {
        return vec![start];
    }
    let step = (stop - start) / (num - 1) as f64;
    (0..num)
        .map(|i| {
            if i == num - 1 {
                stop
            } else {
                start + step * i as f64
            }
        })
        .collect()
}
