//! YAML sweep definition files.
//!
//! ```yaml
//! model: shell_test.FCStd
//! variables:
//!   - object: Sketch
//!     property: HoleDiam
//!     linspace: { start: 10, stop: 30, num: 3 }
//!   - object: MaterialSolid
//!     property: Material
//!     values: [Aluminium-Generic, Steel-Generic]
//! outputs:
//!   - field: vonMises
//!     reduction: median
//!   - field: vonMises
//!     reduction: percentile
//!     percentile: 95
//!     label: 95th percentile
//! solver:
//!   results_name: CCX_Results
//!   solver_name: SolverCcxTools
//! options:
//!   export_results: true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use paramfea_core::config::{
    OutputDefinition, RunOptions, SolverSettings, SweepConfig, VariableDefinition,
};
use paramfea_core::error::ConfigurationError;
use paramfea_core::model::{ParamValue, Target};
use paramfea_core::reduction::Reduction;
use serde::{Deserialize, Serialize};

use crate::util::io::atomic_write;

/// Errors loading or converting a sweep file
#[derive(Debug)]
pub enum SweepFileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(String),
    Serialize(String),
    /// A variable entry gives neither or both of `values` and `linspace`
    Variable {
        target: Target,
        reason: &'static str,
    },
    /// An output entry has an inconsistent reduction
    Output {
        field: String,
        reason: String,
    },
    Config(ConfigurationError),
}

impl fmt::Display for SweepFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepFileError::Io { path, source } => {
                write!(f, "could not read {}: {source}", path.display())
            }
            SweepFileError::Parse(msg) => write!(f, "invalid sweep file: {msg}"),
            SweepFileError::Serialize(msg) => write!(f, "could not serialize sweep file: {msg}"),
            SweepFileError::Variable { target, reason } => {
                write!(f, "variable {target}: {reason}")
            }
            SweepFileError::Output { field, reason } => {
                write!(f, "output on `{field}`: {reason}")
            }
            SweepFileError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SweepFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepFileError::Io { source, .. } => Some(source),
            SweepFileError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for SweepFileError {
    fn from(err: ConfigurationError) -> Self {
        SweepFileError::Config(err)
    }
}

/// A complete sweep definition as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepFile {
    /// Model document the sweep was written for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    pub variables: Vec<VariableData>,

    /// Omit to use the built-in peak stress and displacement outputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputData>,

    #[serde(default)]
    pub solver: SolverSettings,

    #[serde(default)]
    pub options: RunOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableData {
    pub object: String,
    pub property: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ParamValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linspace: Option<LinspaceData>,
}

/// `num` evenly spaced values from `start` to `stop`, both included
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinspaceData {
    pub start: f64,
    pub stop: f64,
    pub num: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputData {
    /// Raw result field, e.g. `vonMises`
    pub field: String,

    #[serde(default)]
    pub reduction: ReductionKind,

    /// Required when `reduction` is `percentile`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Built-in reductions selectable from a sweep file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    #[default]
    Max,
    Min,
    Mean,
    Median,
    Sum,
    AbsMax,
    Range,
    StdDev,
    Percentile,
}

impl VariableData {
    fn target(&self) -> Target {
        Target::new(&self.object, &self.property)
    }

    pub fn to_definition(&self) -> Result<VariableDefinition, SweepFileError> {
        match (&self.values, &self.linspace) {
            (Some(values), None) => Ok(VariableDefinition::new(
                &self.object,
                &self.property,
                values.iter().cloned(),
            )?),
            (None, Some(range)) => Ok(VariableDefinition::linspace(
                &self.object,
                &self.property,
                range.start,
                range.stop,
                range.num,
            )?),
            (Some(_), Some(_)) => Err(SweepFileError::Variable {
                target: self.target(),
                reason: "give either `values` or `linspace`, not both",
            }),
            (None, None) => Err(SweepFileError::Variable {
                target: self.target(),
                reason: "missing `values` or `linspace`",
            }),
        }
    }
}

impl OutputData {
    fn reduction(&self) -> Result<Reduction, SweepFileError> {
        let reduction = match (self.reduction, self.percentile) {
            (ReductionKind::Percentile, Some(p)) => {
                if !(0.0..=100.0).contains(&p) {
                    return Err(self.invalid(format!("percentile {p} outside [0, 100]")));
                }
                Reduction::percentile(p)
            }
            (ReductionKind::Percentile, None) => {
                return Err(self.invalid("`percentile` reduction needs a `percentile` value".into()));
            }
            (_, Some(_)) => {
                return Err(self.invalid("`percentile` is only valid with `reduction: percentile`".into()));
            }
            (ReductionKind::Max, None) => Reduction::max(),
            (ReductionKind::Min, None) => Reduction::min(),
            (ReductionKind::Mean, None) => Reduction::mean(),
            (ReductionKind::Median, None) => Reduction::median(),
            (ReductionKind::Sum, None) => Reduction::sum(),
            (ReductionKind::AbsMax, None) => Reduction::abs_max(),
            (ReductionKind::Range, None) => Reduction::range(),
            (ReductionKind::StdDev, None) => Reduction::std_dev(),
        };
        Ok(reduction)
    }

    fn invalid(&self, reason: String) -> SweepFileError {
        SweepFileError::Output {
            field: self.field.clone(),
            reason,
        }
    }

    pub fn to_definition(&self) -> Result<OutputDefinition, SweepFileError> {
        let output = OutputDefinition::new(&self.field, self.reduction()?);
        Ok(match &self.label {
            Some(label) => output.with_label(label),
            None => output,
        })
    }
}

impl SweepFile {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SweepFileError> {
        serde_saphyr::from_str(yaml).map_err(|e| SweepFileError::Parse(e.to_string()))
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, SweepFileError> {
        serde_saphyr::to_string(self).map_err(|e| SweepFileError::Serialize(e.to_string()))
    }

    /// Read a sweep file. Relative `model` and `output_folder` paths are
    /// taken relative to the file's own directory.
    pub fn load(path: &Path) -> Result<Self, SweepFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| SweepFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            file.resolve_relative(base);
        }
        tracing::debug!(
            path = %path.display(),
            variables = file.variables.len(),
            outputs = file.outputs.len(),
            "Loaded sweep file"
        );
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<(), SweepFileError> {
        let yaml = self.to_yaml()?;
        atomic_write(path, &yaml).map_err(|source| SweepFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolve_relative(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(model) = self.model.as_mut() {
            resolve(model);
        }
        if let Some(folder) = self.options.output_folder.as_mut() {
            resolve(folder);
        }
    }

    /// Convert to a validated sweep configuration
    pub fn to_config(&self) -> Result<SweepConfig, SweepFileError> {
        let variables = self
            .variables
            .iter()
            .map(VariableData::to_definition)
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = if self.outputs.is_empty() {
            OutputDefinition::defaults()
        } else {
            self.outputs
                .iter()
                .map(OutputData::to_definition)
                .collect::<Result<Vec<_>, _>>()?
        };
        let config = SweepConfig {
            variables,
            outputs,
            solver: self.solver.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn run_options(&self) -> &RunOptions {
        &self.options
    }
}
