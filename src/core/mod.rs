// mod.rs - Core logic module

pub mod alignment;
pub mod alphabet;
pub mod cognates;
pub mod edit_distance;
pub mod estimator;
pub mod measure;
pub mod relatedness;
pub mod screener;
pub mod substitution;
pub mod tuning;

// Re-export main types for convenience
pub use alignment::{align, pmi_alignment, Alignment, AlignmentConfig, ScoringPolicy, NO_ALIGNMENT_SCORE};
pub use cognates::{candidate_pairs, select, CognatePair};
pub use edit_distance::{list_distance, normalized_distance, VariantMode};
pub use estimator::{reestimate, run_round, CandidatePolicy, EstimatorConfig, Estimation, RoundSummary};
pub use measure::{AlignmentMeasure, ConceptDistance, EditDistanceMeasure};
pub use relatedness::{RelatednessBreakdown, RelatednessScorer};
pub use screener::{screen, PairScore, RelatedLanguagePair, Screening, DEFAULT_THETA_DERC};
pub use substitution::{CharacterFrequencyTable, PairCounts, SubstitutionMatrix, SymbolPair};
pub use tuning::{sample_pairs, TuningObjective, TuningParams};
