//! Result extraction: raw fields in, scalar outputs out.

use crate::config::OutputDefinition;
use crate::engine::FeaEngine;
use crate::error::ExtractionError;

/// Reduces solved fields to the configured output columns
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    outputs: &'a [OutputDefinition],
    labels: Vec<String>,
}

impl<'a> Extractor<'a> {
    pub fn new(outputs: &'a [OutputDefinition]) -> Self {
        Self {
            outputs,
            labels: outputs.iter().map(OutputDefinition::label).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// One `(label, value)` per output definition, in declaration order.
    ///
    /// Reads only; extracting twice from the same solved state gives the same
    /// values as long as the reductions are pure. Several outputs may share a
    /// source field, which is then read once per output.
    pub fn extract<E: FeaEngine>(
        &self,
        engine: &E,
        solved: &E::Solved,
    ) -> Result<Vec<(String, f64)>, ExtractionError> {
        self.outputs
            .iter()
            .zip(&self.labels)
            .map(|(output, label)| -> Result<(String, f64), ExtractionError> {
                let field = engine
                    .read_field(solved, output.source_field())
                    .ok_or_else(|| ExtractionError::MissingField(output.source_field().to_string()))?;
                let value = output
                    .reduction()
                    .apply(&field)
                    .map_err(|source| ExtractionError::Reduction {
                        label: label.clone(),
                        source,
                    })?;
                Ok((label.clone(), value))
            })
            .collect()
    }
}
