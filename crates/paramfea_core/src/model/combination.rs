use serde::Serialize;

use super::value::ParamValue;

/// One point of the parameter space: a value for every variable, in
/// declaration order, tagged with its position in the enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterCombination {
    /// Ordinal in enumeration order (0-based)
    pub index: usize,
    /// Index into each variable's value list
    pub value_indices: Vec<usize>,
    pub values: Vec<ParamValue>,
}

impl ParameterCombination {
    /// Value assigned to the `dim`-th variable
    pub fn value(&self, dim: usize) -> Option<&ParamValue> {
        self.values.get(dim)
    }

    /// Number of variables
    pub fn ndim(&self) -> usize {
        self.values.len()
    }
}
