// measure.rs - Per-concept distance functions feeding the rank statistic

use std::fmt::Debug;

use crate::core::alignment::{pmi_alignment, AlignmentConfig};
use crate::core::edit_distance::{list_distance, reduce, VariantMode};
use crate::core::substitution::SubstitutionMatrix;
use crate::error::{LexError, Result};

/// Distance between the variants of two concept slots; smaller means more similar.
///
/// Callers pass attested variants only (missing markers already removed).
pub trait ConceptDistance: Send + Sync + Debug {
    fn distance(&self, variants1: &[&str], variants2: &[&str], mode: VariantMode) -> Result<f64>;

    /// Short identifier used in logs and output headers
    fn name(&self) -> &'static str;

    /// One-line description for status output
    fn description(&self) -> &'static str;
}

/// Normalized Levenshtein distance (dERC/LDN)
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceMeasure;

impl ConceptDistance for EditDistanceMeasure {
    fn distance(&self, variants1: &[&str], variants2: &[&str], mode: VariantMode) -> Result<f64> {
        list_distance(variants1, variants2, mode)
    }

    fn name(&self) -> &'static str {
        "LDN"
    }

    fn description(&self) -> &'static str {
        "Normalized Levenshtein distance"
    }
}

/// Negated substitution-matrix alignment score (dERC/PMI)
#[derive(Debug, Clone)]
pub struct AlignmentMeasure<'a> {
    matrix: &'a SubstitutionMatrix,
    config: AlignmentConfig,
}

impl<'a> AlignmentMeasure<'a> {
    pub fn new(matrix: &'a SubstitutionMatrix, config: AlignmentConfig) -> Self {
        Self { matrix, config }
    }

    /// Alignment score of the variant lists: best is the highest score
    pub fn list_score(&self, variants1: &[&str], variants2: &[&str], mode: VariantMode) -> Result<f64> {
        if variants1.is_empty() || variants2.is_empty() {
            return Err(LexError::EmptyVariantList);
        }
        let scores = variants1.iter().flat_map(|w1| {
            variants2
                .iter()
                .map(move |w2| pmi_alignment(w1, w2, self.matrix, &self.config).score)
        });
        Ok(reduce(scores, mode, f64::max))
    }
}

impl ConceptDistance for AlignmentMeasure<'_> {
    fn distance(&self, variants1: &[&str], variants2: &[&str], mode: VariantMode) -> Result<f64> {
        // Larger scores mean more similar; the rank statistic wants the opposite
        Ok(-self.list_score(variants1, variants2, mode)?)
    }

    fn name(&self) -> &'static str {
        "PMI"
    }

    fn description(&self) -> &'static str {
        "Negated substitution-matrix alignment score"
    }
}
