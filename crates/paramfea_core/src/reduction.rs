//! Reduction callbacks collapsing a raw result field into one scalar.
//!
//! A reduction must be a pure, total function over a finite sequence of
//! floats: called twice on the same field it returns the same value. The
//! extractor does not check this; it is part of the contract of every
//! [`Reduction`] handed to an output definition.

use std::fmt;
use std::sync::Arc;

use crate::error::ReductionError;

type ReduceFn = dyn Fn(&[f64]) -> Result<f64, ReductionError> + Send + Sync;

/// A named, shareable reduction function
#[derive(Clone)]
pub struct Reduction {
    name: String,
    func: Arc<ReduceFn>,
}

impl Reduction {
    /// Wrap a fallible reduction
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, ReductionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Wrap a reduction that cannot fail on non-empty, finite input.
    ///
    /// Empty fields are reported as [`ReductionError::EmptyInput`] and fields
    /// holding NaN or infinity as [`ReductionError::NonFinite`], both before
    /// `func` runs.
    pub fn total<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::from_fn(name, move |values| finite(values).map(&func))
    }

    /// Name used to derive default column labels
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, values: &[f64]) -> Result<f64, ReductionError> {
        (self.func)(values)
    }

    // =========================================================================
    // Built-in reductions
    // =========================================================================

    pub fn max() -> Self {
        Self::from_fn("max", |v| finite(v).map(|v| fold(v, f64::max)))
    }

    pub fn min() -> Self {
        Self::from_fn("min", |v| finite(v).map(|v| fold(v, f64::min)))
    }

    /// Largest magnitude, useful for signed displacement components
    pub fn abs_max() -> Self {
        Self::from_fn("abs_max", |v| {
            finite(v).map(|v| v.iter().map(|x| x.abs()).fold(0.0, f64::max))
        })
    }

    pub fn sum() -> Self {
        Self::total("sum", |v| v.iter().sum())
    }

    pub fn mean() -> Self {
        Self::total("mean", |v| v.iter().sum::<f64>() / v.len() as f64)
    }

    pub fn median() -> Self {
        Self::from_fn("median", |v| {
            let sorted = sorted_finite(v)?;
            Ok(interpolate_sorted(&sorted, 0.5))
        })
    }

    /// Spread between the largest and smallest value
    pub fn range() -> Self {
        Self::from_fn("range", |v| {
            let v = finite(v)?;
            Ok(fold(v, f64::max) - fold(v, f64::min))
        })
    }

    /// Population standard deviation
    pub fn std_dev() -> Self {
        Self::total("std_dev", |v| {
            let n = v.len() as f64;
            let mean = v.iter().sum::<f64>() / n;
            (v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt()
        })
    }

    /// Percentile in `[0, 100]`, linearly interpolated between closest ranks
    pub fn percentile(p: f64) -> Self {
        let name = format!("p{p}");
        Self::from_fn(name, move |v| {
            if !(0.0..=100.0).contains(&p) {
                return Err(ReductionError::Invalid(format!(
                    "percentile {p} outside [0, 100]"
                )));
            }
            let sorted = sorted_finite(v)?;
            Ok(interpolate_sorted(&sorted, p / 100.0))
        })
    }
}

impl fmt::Debug for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reduction").field("name", &self.name).finish()
    }
}

impl Default for Reduction {
    fn default() -> Self {
        Self::max()
    }
}

/// Non-empty and free of NaN/inf
fn finite(values: &[f64]) -> Result<&[f64], ReductionError> {
    if values.is_empty() {
        return Err(ReductionError::EmptyInput);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ReductionError::NonFinite);
    }
    Ok(values)
}

fn fold(values: &[f64], f: fn(f64, f64) -> f64) -> f64 {
    values[1..].iter().copied().fold(values[0], f)
}

fn sorted_finite(values: &[f64]) -> Result<Vec<f64>, ReductionError> {
    let mut sorted = finite(values)?.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Quantile `q` in `[0, 1]` of sorted, non-empty data
fn interpolate_sorted(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
