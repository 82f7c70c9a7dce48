use std::fmt;
use std::path::PathBuf;

use crate::model::Target;

/// Errors detected while configuring a sweep. Raised before any combination runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No variable definitions were given
    EmptyParameterSpace,
    /// A variable was declared with no candidate values
    EmptyValues(Target),
    /// Two variables target the same object property
    DuplicateVariable(Target),
    /// Two columns share a label
    DuplicateLabel(String),
    /// The cartesian product does not fit in `usize`
    ParameterSpaceTooLarge,
    /// A generated value range is malformed
    InvalidRange {
        target: Target,
        reason: &'static str,
    },
    /// Field export requested but no folder is known
    MissingOutputFolder,
    /// Solver or result-set identifier is blank
    EmptySolverName,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyParameterSpace => write!(f, "no variables to sweep"),
            ConfigurationError::EmptyValues(target) => {
                write!(f, "variable {target} has no candidate values")
            }
            ConfigurationError::DuplicateVariable(target) => {
                write!(f, "variable {target} is declared more than once")
            }
            ConfigurationError::DuplicateLabel(label) => {
                write!(f, "column label `{label}` is used more than once")
            }
            ConfigurationError::ParameterSpaceTooLarge => {
                write!(f, "parameter space is too large to enumerate")
            }
            ConfigurationError::InvalidRange { target, reason } => {
                write!(f, "invalid range for {target}: {reason}")
            }
            ConfigurationError::MissingOutputFolder => write!(
                f,
                "field export requested but no output folder was given and the model path is unknown"
            ),
            ConfigurationError::EmptySolverName => {
                write!(f, "solver and result-set names must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Why the engine refused a property assignment
#[derive(Debug, Clone, PartialEq)]
pub enum MutationErrorKind {
    UnknownObject,
    UnknownProperty,
    /// The engine rejected the value (out-of-domain constraint, unknown material, ...)
    Rejected(String),
    /// The assignment was accepted but the model failed to recompute
    Recompute(String),
}

/// A property assignment that could not be applied to the live model
#[derive(Debug, Clone, PartialEq)]
pub struct MutationError {
    pub target: Target,
    pub kind: MutationErrorKind,
}

impl MutationError {
    pub fn unknown_object(target: Target) -> Self {
        Self {
            target,
            kind: MutationErrorKind::UnknownObject,
        }
    }

    pub fn unknown_property(target: Target) -> Self {
        Self {
            target,
            kind: MutationErrorKind::UnknownProperty,
        }
    }

    pub fn rejected(target: Target, reason: impl Into<String>) -> Self {
        Self {
            target,
            kind: MutationErrorKind::Rejected(reason.into()),
        }
    }

    pub fn recompute(target: Target, reason: impl Into<String>) -> Self {
        Self {
            target,
            kind: MutationErrorKind::Recompute(reason.into()),
        }
    }
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MutationErrorKind::UnknownObject => {
                write!(f, "object `{}` not found in model", self.target.object)
            }
            MutationErrorKind::UnknownProperty => write!(
                f,
                "object `{}` has no property `{}`",
                self.target.object, self.target.property
            ),
            // Engine messages already carry their own context
            MutationErrorKind::Rejected(reason) => f.write_str(reason),
            MutationErrorKind::Recompute(reason) => {
                write!(f, "recompute failed after setting {}: {reason}", self.target)
            }
        }
    }
}

impl std::error::Error for MutationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveErrorKind {
    /// Solver reported an error (bad mesh, missing prerequisites, ...)
    Failed,
    NotConverged,
    /// Solver process exited abnormally
    Terminated,
    /// Named solver or result object does not exist
    MissingObject,
}

/// The external solve did not produce a usable result
#[derive(Debug, Clone, PartialEq)]
pub struct SolveError {
    pub kind: SolveErrorKind,
    /// Diagnostic text captured from the engine
    pub diagnostics: String,
}

impl SolveError {
    pub fn new(kind: SolveErrorKind, diagnostics: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostics: diagnostics.into(),
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            SolveErrorKind::Failed => "solver failed",
            SolveErrorKind::NotConverged => "solver did not converge",
            SolveErrorKind::Terminated => "solver terminated abnormally",
            SolveErrorKind::MissingObject => "solver setup incomplete",
        };
        if self.diagnostics.is_empty() {
            f.write_str(what)
        } else {
            write!(f, "{what}: {}", self.diagnostics)
        }
    }
}

impl std::error::Error for SolveError {}

/// Failure raised by a reduction callback
#[derive(Debug, Clone, PartialEq)]
pub enum ReductionError {
    EmptyInput,
    NonFinite,
    Invalid(String),
}

impl fmt::Display for ReductionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionError::EmptyInput => write!(f, "cannot reduce an empty field"),
            ReductionError::NonFinite => write!(f, "field contains NaN or infinite values"),
            ReductionError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ReductionError {}

/// Failure turning a solved state into scalar outputs
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The solved state does not carry the requested field
    MissingField(String),
    Reduction {
        label: String,
        source: ReductionError,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::MissingField(field) => {
                write!(f, "field `{field}` not present in solved results")
            }
            ExtractionError::Reduction { label, source } => {
                write!(f, "reduction for `{label}` failed: {source}")
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Reduction { source, .. } => Some(source),
            ExtractionError::MissingField(_) => None,
        }
    }
}

/// Failure writing results outside of memory
#[derive(Debug)]
pub enum ExportError {
    /// The engine cannot export solved fields
    Unsupported,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(String),
    UnknownFormat(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Unsupported => write!(f, "engine does not support field export"),
            ExportError::Io { path, source } => {
                write!(f, "could not write {}: {source}", path.display())
            }
            ExportError::Serialize(msg) => write!(f, "serialization error: {msg}"),
            ExportError::UnknownFormat(fmt_name) => {
                write!(f, "export format `{fmt_name}` not implemented")
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Any failure inside one combination's processing.
///
/// Never escapes the orchestrator loop; it is folded into the run's record.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Mutation(MutationError),
    Solve(SolveError),
    Extraction(ExtractionError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Mutation(e) => write!(f, "{e}"),
            RunError::Solve(e) => write!(f, "{e}"),
            RunError::Extraction(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Mutation(e) => Some(e),
            RunError::Solve(e) => Some(e),
            RunError::Extraction(e) => Some(e),
        }
    }
}

impl From<MutationError> for RunError {
    fn from(err: MutationError) -> Self {
        RunError::Mutation(err)
    }
}

impl From<SolveError> for RunError {
    fn from(err: SolveError) -> Self {
        RunError::Solve(err)
    }
}

impl From<ExtractionError> for RunError {
    fn from(err: ExtractionError) -> Self {
        RunError::Extraction(err)
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_mutation_displays_engine_reason() {
        let err = MutationError::rejected(Target::new("B", "y"), "B.y out of range");
        assert_eq!(err.to_string(), "B.y out of range");
    }

    #[test]
    fn test_unknown_object_names_target() {
        let err = MutationError::unknown_object(Target::new("Pocket", "Depth"));
        assert!(err.to_string().contains("Pocket"));
    }

    #[test]
    fn test_solve_error_display() {
        let err = SolveError::new(SolveErrorKind::NotConverged, "");
        assert_eq!(err.to_string(), "solver did not converge");
        let err = SolveError::new(SolveErrorKind::Failed, "*ERROR in e_c3d");
        assert_eq!(err.to_string(), "solver failed: *ERROR in e_c3d");
    }

    #[test]
    fn test_run_error_wraps_source() {
        let err: RunError = ExtractionError::Reduction {
            label: "max(vonMises)".to_string(),
            source: ReductionError::EmptyInput,
        }
        .into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("max(vonMises)"));
    }
}
