// tuning.rs - Objective function for the external hyperparameter search

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::alignment::AlignmentConfig;
use crate::core::cognates::CognatePair;
use crate::core::estimator::{reestimate, CandidatePolicy, EstimatorConfig};
use crate::core::measure::{AlignmentMeasure, ConceptDistance, EditDistanceMeasure};
use crate::core::relatedness::RelatednessScorer;
use crate::core::screener::RelatedLanguagePair;
use crate::core::substitution::{CharacterFrequencyTable, SubstitutionMatrix};
use crate::error::{LexError, Result};

/// The three scalars the optimizer searches over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningParams {
    pub gap_open: f64,
    pub gap_extend: f64,
    pub theta_pmi: f64,
}

impl Default for TuningParams {
    fn default() -> Self {
        let alignment = AlignmentConfig::default();
        Self {
            gap_open: alignment.gap_open,
            gap_extend: alignment.gap_extend,
            theta_pmi: EstimatorConfig::default().theta,
        }
    }
}

/// Everything held fixed while the optimizer varies `TuningParams`
#[derive(Debug, Clone)]
pub struct TuningObjective {
    pub candidates: Vec<CognatePair>,
    pub freq_table: CharacterFrequencyTable,
    pub seed_matrix: SubstitutionMatrix,
    pub evaluation_pairs: Vec<RelatedLanguagePair>,
    pub iterations: usize,
    pub policy: CandidatePolicy,
}

impl TuningObjective {
    pub fn estimator_config(&self, params: TuningParams) -> EstimatorConfig {
        EstimatorConfig {
            alignment: AlignmentConfig::custom(params.gap_open, params.gap_extend),
            theta: params.theta_pmi,
            iterations: self.iterations,
            policy: self.policy,
        }
    }

    /// Re-estimate the matrix under `params` and return the mean dERC/PMI over
    /// the evaluation pairs. Lower is better.
    pub fn evaluate(&self, params: TuningParams) -> Result<f64> {
        let config = self.estimator_config(params);
        let estimation = reestimate(&self.candidates, &config, &self.freq_table, &self.seed_matrix)?;
        let measure = AlignmentMeasure::new(&estimation.matrix, config.alignment);
        self.mean_distance(&measure)
    }

    /// Mean dERC/LDN over the evaluation pairs, for comparison with `evaluate`
    pub fn baseline_ldn(&self) -> Result<f64> {
        self.mean_distance(&EditDistanceMeasure)
    }

    fn mean_distance(&self, measure: &dyn ConceptDistance) -> Result<f64> {
        if self.evaluation_pairs.is_empty() {
            return Err(LexError::InvalidParameter(
                "no evaluation pairs to average over".to_string(),
            ));
        }
        let scorer = RelatednessScorer::new(measure);
        let distances = self
            .evaluation_pairs
            .par_iter()
            .map(|pair| scorer.score(&pair.left, &pair.right))
            .collect::<Result<Vec<f64>>>()?;
        Ok(distances.iter().sum::<f64>() / distances.len() as f64)
    }
}

/// Seeded sample of `n` pairs without replacement; all of them when `n` is larger
pub fn sample_pairs<T: Clone>(pairs: &[T], n: usize, seed: u64) -> Vec<T> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    pairs.choose_multiple(&mut rng, n).cloned().collect()
}
