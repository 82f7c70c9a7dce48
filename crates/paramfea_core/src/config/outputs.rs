//! Scalar metrics extracted from solved result fields.

use crate::reduction::Reduction;

/// Field holding per-node von Mises stress in the default result set
pub const VON_MISES: &str = "vonMises";
/// Field holding per-node displacement magnitudes in the default result set
pub const DISPLACEMENT_LENGTHS: &str = "DisplacementLengths";

/// One output column: a raw field reduced to a scalar.
///
/// When no label is given the column is called `<reduction>(<field>)`,
/// e.g. `max(vonMises)`.
#[derive(Debug, Clone)]
pub struct OutputDefinition {
    source_field: String,
    reduction: Reduction,
    label: Option<String>,
}

impl OutputDefinition {
    pub fn new(source_field: impl Into<String>, reduction: Reduction) -> Self {
        Self {
            source_field: source_field.into(),
            reduction,
            label: None,
        }
    }

    /// Maximum of a field
    pub fn max_of(source_field: impl Into<String>) -> Self {
        Self::new(source_field, Reduction::max())
    }

    /// Replace the derived column label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source_field(&self) -> &str {
        &self.source_field
    }

    pub fn reduction(&self) -> &Reduction {
        &self.reduction
    }

    /// Column label, explicit or derived
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}({})", self.reduction.name(), self.source_field),
        }
    }

    /// Built-in outputs used when none are configured: peak stress and peak displacement
    pub fn defaults() -> Vec<Self> {
        vec![Self::max_of(VON_MISES), Self::max_of(DISPLACEMENT_LENGTHS)]
    }
}
