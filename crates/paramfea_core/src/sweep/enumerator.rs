//! Parameter space enumeration.
//!
//! The space is the cartesian product of all variable value lists, walked in
//! row-major order: the first declared variable varies slowest and the last
//! declared varies fastest. For `A.x in [1, 2]` and `B.y in [10, 20, 30]`
//! the order is `(1,10) (1,20) (1,30) (2,10) (2,20) (2,30)`.
//!
//! Enumeration is lazy; each call to [`ParameterSpace::combinations`] starts a
//! fresh walk over the same order.

use std::iter::FusedIterator;

use crate::config::VariableDefinition;
use crate::error::ConfigurationError;
use crate::model::ParameterCombination;

/// The cartesian product of a set of variable definitions
#[derive(Debug, Clone)]
pub struct ParameterSpace<'a> {
    variables: &'a [VariableDefinition],
    /// Value count of each dimension
    shape: Vec<usize>,
    /// Precomputed strides for index calculation
    strides: Vec<usize>,
    total: usize,
}

impl<'a> ParameterSpace<'a> {
    /// Build the space. Fails if there is nothing to sweep or the product overflows.
    pub fn new(variables: &'a [VariableDefinition]) -> Result<Self, ConfigurationError> {
        if variables.is_empty() {
            return Err(ConfigurationError::EmptyParameterSpace);
        }
        let shape: Vec<usize> = variables.iter().map(VariableDefinition::len).collect();
        let total = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or(ConfigurationError::ParameterSpaceTooLarge)?;
        let strides = compute_strides(&shape);
        Ok(Self {
            variables,
            shape,
            strides,
            total,
        })
    }

    /// Number of combinations
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn variables(&self) -> &'a [VariableDefinition] {
        self.variables
    }

    /// Start a new walk over the space
    pub fn combinations(&self) -> Combinations<'a> {
        Combinations {
            variables: self.variables,
            shape: self.shape.clone(),
            current: vec![0; self.shape.len()],
            next_index: 0,
            total: self.total,
        }
    }

    /// Convert per-variable value indices to the enumeration ordinal
    pub fn flat_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (i, (&idx, &size)) in indices.iter().zip(&self.shape).enumerate() {
            if idx >= size {
                return None;
            }
            flat += idx * self.strides[i];
        }
        Some(flat)
    }

    /// Convert an enumeration ordinal to per-variable value indices
    pub fn multi_index(&self, flat: usize) -> Option<Vec<usize>> {
        if flat >= self.total {
            return None;
        }
        let mut indices = Vec::with_capacity(self.shape.len());
        let mut remaining = flat;
        for &stride in &self.strides {
            indices.push(remaining / stride);
            remaining %= stride;
        }
        Some(indices)
    }

    /// The combination at a given ordinal, without walking the space
    pub fn get(&self, index: usize) -> Option<ParameterCombination> {
        let indices = self.multi_index(index)?;
        Some(build_combination(self.variables, index, indices))
    }
}

/// Compute strides for row-major order
fn compute_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return Vec::new();
    }
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

fn build_combination(
    variables: &[VariableDefinition],
    index: usize,
    value_indices: Vec<usize>,
) -> ParameterCombination {
    let values = variables
        .iter()
        .zip(&value_indices)
        .map(|(var, &i)| var.values()[i].clone())
        .collect();
    ParameterCombination {
        index,
        value_indices,
        values,
    }
}

/// Lazy iterator over all combinations of a [`ParameterSpace`]
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    variables: &'a [VariableDefinition],
    shape: Vec<usize>,
    current: Vec<usize>,
    next_index: usize,
    total: usize,
}

impl Iterator for Combinations<'_> {
    type Item = ParameterCombination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.total {
            return None;
        }

        let combination = build_combination(self.variables, self.next_index, self.current.clone());
        self.next_index += 1;

        // Odometer increment: last dimension varies fastest
        for i in (0..self.shape.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.shape[i] {
                break;
            }
            self.current[i] = 0;
        }

        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Combinations<'_> {}

impl FusedIterator for Combinations<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamValue;

    fn vars() -> Vec<VariableDefinition> {
        vec![
            VariableDefinition::new("A", "x", [1, 2]).unwrap(),
            VariableDefinition::new("B", "y", [10, 20, 30]).unwrap(),
        ]
    }

    fn as_numbers(combo: &ParameterCombination) -> Vec<f64> {
        combo.values.iter().filter_map(ParamValue::as_f64).collect()
    }

    #[test]
    fn test_first_variable_varies_slowest() {
        let vars = vars();
        let space = ParameterSpace::new(&vars).unwrap();
        let order: Vec<Vec<f64>> = space.combinations().map(|c| as_numbers(&c)).collect();
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
    }

    #[test]
    fn test_indices_are_sequential() {
        let vars = vars();
        let space = ParameterSpace::new(&vars).unwrap();
        let indices: Vec<usize> = space.combinations().map(|c| c.index).collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let vars = vars();
        let space = ParameterSpace::new(&vars).unwrap();
        let first: Vec<_> = space.combinations().collect();
        let second: Vec<_> = space.combinations().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_size() {
        let vars = vec![
            VariableDefinition::linspace("Sketch", "HoleDiam", 10.0, 30.0, 2).unwrap(),
            VariableDefinition::new("MaterialSolid", "Material", ["Al", "Steel"]).unwrap(),
            VariableDefinition::linspace("ShellThickness", "Thickness", 10.0, 20.0, 3).unwrap(),
        ];
        let space = ParameterSpace::new(&vars).unwrap();
        assert_eq!(space.len(), 12);
        let mut iter = space.combinations();
        assert_eq!(iter.len(), 12);
        iter.next();
        assert_eq!(iter.len(), 11);
        assert_eq!(iter.count(), 11);
    }

    #[test]
    fn test_combinations_are_distinct() {
        let vars = vec![
            VariableDefinition::new("A", "x", [1, 2, 3]).unwrap(),
            VariableDefinition::new("B", "y", [1, 2]).unwrap(),
            VariableDefinition::new("C", "z", ["a", "b"]).unwrap(),
        ];
        let space = ParameterSpace::new(&vars).unwrap();
        let all: Vec<Vec<usize>> = space.combinations().map(|c| c.value_indices).collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(all.len(), 12);
    }

    #[test]
    fn test_single_variable() {
        let vars = vec![VariableDefinition::new("A", "x", [7]).unwrap()];
        let space = ParameterSpace::new(&vars).unwrap();
        let all: Vec<_> = space.combinations().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].values, vec![ParamValue::Number(7.0)]);
    }

    #[test]
    fn test_empty_space_is_an_error() {
        assert_eq!(
            ParameterSpace::new(&[]).unwrap_err(),
            ConfigurationError::EmptyParameterSpace
        );
    }

    #[test]
    fn test_random_access_matches_walk() {
        let vars = vars();
        let space = ParameterSpace::new(&vars).unwrap();
        for combo in space.combinations() {
            assert_eq!(space.get(combo.index).as_ref(), Some(&combo));
            assert_eq!(space.flat_index(&combo.value_indices), Some(combo.index));
        }
        assert!(space.get(6).is_none());
        assert!(space.flat_index(&[0, 3]).is_none());
    }
}
