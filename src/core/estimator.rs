// estimator.rs - Iterative re-estimation of the substitution matrix

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::alignment::{align, pmi_alignment, Alignment, AlignmentConfig, ScoringPolicy};
use crate::core::cognates::CognatePair;
use crate::core::substitution::{CharacterFrequencyTable, PairCounts, SubstitutionMatrix};
use crate::error::{LexError, Result};

/// Which candidates are re-aligned in the round after the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidatePolicy {
    /// Every round re-aligns the original candidate set
    FullSet,
    /// Each round only re-aligns the pairs accepted by the previous round
    NarrowToAccepted,
}

impl FromStr for CandidatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "full-set" => Ok(CandidatePolicy::FullSet),
            "accepted" | "narrow" => Ok(CandidatePolicy::NarrowToAccepted),
            _ => Err(format!("Invalid candidate policy: {}. Use: full, accepted", s)),
        }
    }
}

impl fmt::Display for CandidatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidatePolicy::FullSet => write!(f, "full"),
            CandidatePolicy::NarrowToAccepted => write!(f, "accepted"),
        }
    }
}

/// Parameters of one re-estimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub alignment: AlignmentConfig,
    /// Minimum alignment score for a pair to count as cognate evidence
    pub theta: f64,
    /// Number of rounds; fixed, there is no convergence test
    pub iterations: usize,
    pub policy: CandidatePolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            alignment: AlignmentConfig::default(),
            theta: 5.59488733,
            iterations: 11,
            policy: CandidatePolicy::FullSet,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.alignment.gap_open, self.alignment.gap_extend, self.theta];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(LexError::InvalidParameter(
                "gap scores and theta must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters describing one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub candidates: usize,
    pub unique_pairs: usize,
    pub accepted: usize,
    pub aligned_columns: u64,
    pub observed_pairs: usize,
}

/// Result of a single round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub matrix: SubstitutionMatrix,
    /// Accepted candidates, duplicates included, in candidate order
    pub accepted: Vec<CognatePair>,
    pub summary: RoundSummary,
}

/// Final matrix plus per-round counters
#[derive(Debug, Clone)]
pub struct Estimation {
    pub matrix: SubstitutionMatrix,
    pub rounds: Vec<RoundSummary>,
}

/// Align each distinct (canonical) pair once, in parallel
fn align_unique<F>(canonical: &[CognatePair], aligner: F) -> HashMap<CognatePair, Alignment>
where
    F: Fn(&CognatePair) -> Alignment + Sync,
{
    let mut seen = HashSet::new();
    let unique: Vec<&CognatePair> = canonical.iter().filter(|p| seen.insert(*p)).collect();

    unique
        .into_par_iter()
        .map(|pair| (pair.clone(), aligner(pair)))
        .collect()
}

/// One round: align candidates under `matrix`, keep pairs scoring at least
/// `theta`, and recompute the log-odds entries their alignments touch.
///
/// The alignment cache lives only for the duration of the call. `matrix` is
/// not modified; the updated matrix is returned.
pub fn run_round(
    candidates: &[CognatePair],
    matrix: &SubstitutionMatrix,
    config: &EstimatorConfig,
    freq: &CharacterFrequencyTable,
    round: usize,
) -> RoundOutcome {
    let canonical: Vec<CognatePair> = candidates.iter().map(CognatePair::canonical).collect();
    let cache = align_unique(&canonical, |pair| {
        pmi_alignment(&pair.word1, &pair.word2, matrix, &config.alignment)
    });

    let mut counts = PairCounts::default();
    let mut accepted = Vec::new();
    for (candidate, key) in candidates.iter().zip(&canonical) {
        if let Some(alignment) = cache.get(key) {
            if alignment.score >= config.theta {
                counts.add_alignment(alignment);
                accepted.push(candidate.clone());
            }
        }
    }

    let summary = RoundSummary {
        round,
        candidates: candidates.len(),
        unique_pairs: cache.len(),
        accepted: accepted.len(),
        aligned_columns: counts.total(),
        observed_pairs: counts.distinct_pairs(),
    };

    RoundOutcome {
        matrix: matrix.with_log_odds(&counts, freq),
        accepted,
        summary,
    }
}

/// Run `config.iterations` rounds starting from `seed`.
pub fn reestimate(
    candidates: &[CognatePair],
    config: &EstimatorConfig,
    freq: &CharacterFrequencyTable,
    seed: &SubstitutionMatrix,
) -> Result<Estimation> {
    config.validate()?;

    let mut matrix = seed.clone();
    let mut working: Vec<CognatePair> = candidates.to_vec();
    let mut rounds = Vec::with_capacity(config.iterations);

    for round in 1..=config.iterations {
        let outcome = run_round(&working, &matrix, config, freq, round);
        matrix = outcome.matrix;
        rounds.push(outcome.summary);
        if config.policy == CandidatePolicy::NarrowToAccepted {
            working = outcome.accepted;
        }
    }

    Ok(Estimation { matrix, rounds })
}

impl SubstitutionMatrix {
    /// Initial matrix: identity-scored alignments of every candidate, all counted
    pub fn seed(candidates: &[CognatePair], freq: &CharacterFrequencyTable) -> Self {
        let canonical: Vec<CognatePair> = candidates.iter().map(CognatePair::canonical).collect();
        let cache = align_unique(&canonical, |pair| {
            align(&pair.word1, &pair.word2, &ScoringPolicy::Identity)
        });

        let mut counts = PairCounts::default();
        for key in &canonical {
            if let Some(alignment) = cache.get(key) {
                counts.add_alignment(alignment);
            }
        }
        SubstitutionMatrix::new().with_log_odds(&counts, freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::substitution::SymbolPair;

    fn candidates() -> Vec<CognatePair> {
        vec![
            CognatePair::new("pater", "fater"),
            CognatePair::new("fater", "pater"),
            CognatePair::new("tu", "du"),
            CognatePair::new("mano", "kukuru"),
            CognatePair::new("nokt", "naxt"),
        ]
    }

    fn freq() -> CharacterFrequencyTable {
        CharacterFrequencyTable::from_counts(
            "paterfudmnokxt"
                .chars()
                .map(|c| (c, if "aeiou".contains(c) { 8 } else { 3 })),
        )
    }

    fn config(theta: f64, iterations: usize) -> EstimatorConfig {
        EstimatorConfig {
            alignment: AlignmentConfig::custom(-2.0, -1.0),
            theta,
            iterations,
            policy: CandidatePolicy::FullSet,
        }
    }

    #[test]
    fn test_single_iteration_matches_manual_pass() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let config = config(0.5, 1);

        let estimated = reestimate(&candidates(), &config, &freq, &seed).unwrap();

        let mut counts = PairCounts::default();
        for pair in candidates() {
            let pair = pair.canonical();
            let alignment = pmi_alignment(&pair.word1, &pair.word2, &seed, &config.alignment);
            if alignment.score >= config.theta {
                counts.add_alignment(&alignment);
            }
        }
        let manual = seed.with_log_odds(&counts, &freq);

        assert_eq!(estimated.matrix, manual);
        assert_eq!(estimated.rounds.len(), 1);
    }

    #[test]
    fn test_duplicates_are_aligned_once_but_counted_each_time() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let outcome = run_round(&candidates(), &seed, &config(f64::MIN, 1), &freq, 1);
        assert_eq!(outcome.summary.candidates, 5);
        assert_eq!(outcome.summary.unique_pairs, 4);
        assert_eq!(outcome.summary.accepted, 5);
        // the original orientation of accepted candidates is preserved
        assert_eq!(outcome.accepted[1], CognatePair::new("fater", "pater"));
    }

    #[test]
    fn test_no_accepted_pairs_leaves_matrix_unchanged() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let estimated = reestimate(&candidates(), &config(1e9, 3), &freq, &seed).unwrap();
        assert_eq!(estimated.matrix, seed);
        assert!(estimated.rounds.iter().all(|r| r.accepted == 0));
    }

    #[test]
    fn test_zero_iterations_returns_seed() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let estimated = reestimate(&candidates(), &config(0.0, 0), &freq, &seed).unwrap();
        assert_eq!(estimated.matrix, seed);
        assert!(estimated.rounds.is_empty());
    }

    #[test]
    fn test_narrowing_policy_shrinks_candidate_set() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let mut narrow = config(0.5, 3);
        narrow.policy = CandidatePolicy::NarrowToAccepted;

        let estimated = reestimate(&candidates(), &narrow, &freq, &seed).unwrap();
        assert_eq!(estimated.rounds[0].candidates, 5);
        assert_eq!(estimated.rounds[1].candidates, estimated.rounds[0].accepted);
        assert_eq!(estimated.rounds[2].candidates, estimated.rounds[1].accepted);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        let first = reestimate(&candidates(), &config(0.5, 4), &freq, &seed).unwrap();
        let second = reestimate(&candidates(), &config(0.5, 4), &freq, &seed).unwrap();
        assert_eq!(first.matrix, second.matrix);
        assert_eq!(first.rounds, second.rounds);
    }

    #[test]
    fn test_seed_matrix_rewards_identical_symbols() {
        let freq = freq();
        let seed = SubstitutionMatrix::seed(&candidates(), &freq);
        assert!(seed.score('a', 'a') > 0.0);
        assert!(seed.get('p', 'f').is_some());
        assert_eq!(
            seed.get('a', 't'),
            seed.entries()
                .iter()
                .find(|(pair, _)| *pair == SymbolPair::new('t', 'a'))
                .map(|(_, s)| *s)
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("full".parse::<CandidatePolicy>().unwrap(), CandidatePolicy::FullSet);
        assert_eq!(
            "accepted".parse::<CandidatePolicy>().unwrap(),
            CandidatePolicy::NarrowToAccepted
        );
        assert!("half".parse::<CandidatePolicy>().is_err());
        assert_eq!(CandidatePolicy::NarrowToAccepted.to_string(), "accepted");
    }

    #[test]
    fn test_non_finite_parameters_are_rejected() {
        let freq = freq();
        let seed = SubstitutionMatrix::new();
        let bad = config(f64::NAN, 1);
        assert!(reestimate(&candidates(), &bad, &freq, &seed).is_err());
    }
}
