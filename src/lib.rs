// lib.rs - lexdist library root

//! # lexdist - Language relatedness from basic-vocabulary word lists
//!
//! Estimates how closely two languages are related by comparing same-meaning
//! word pairs against different-meaning word pairs (the dERC rank statistic),
//! with per-concept distances from either normalized edit distance or alignment
//! under a substitution matrix learned from the corpus itself.
//!
//! ## Features
//!
//! - **Affine-gap global alignment** of short words under unit, identity, edit
//!   or substitution-matrix scoring
//! - **PMI bootstrap**: iterative re-estimation of log-odds substitution scores
//!   from accepted cognate alignments
//! - **dERC/LDN and dERC/PMI** calibrated distances in [0, 1]
//! - **Parallel screening** of every language pair in a corpus
//! - **ASJP loader**, culling, family-preserving train/test split, JSON/LZ4 datasets
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use lexdist::prelude::*;
//!
//! let mut corpus = Corpus::from_asjp_file(std::path::Path::new("lists.txt"))?;
//! corpus.cull();
//!
//! let languages = corpus.languages();
//! let screening = screen(&languages, 0.70)?;
//! let related = screening.related_pairs(&languages);
//!
//! let candidates = candidate_pairs(related.iter().map(|p| (&p.left, &p.right)))?;
//! let freq = CharacterFrequencyTable::from_languages(languages.iter().copied())?;
//! let seed = SubstitutionMatrix::seed(&candidates, &freq);
//! let estimation = reestimate(&candidates, &EstimatorConfig::default(), &freq, &seed)?;
//!
//! let measure = AlignmentMeasure::new(&estimation.matrix, AlignmentConfig::default());
//! let scorer = RelatednessScorer::new(&measure);
//! let distance = scorer.score(&related[0].left, &related[0].right)?;
//! # let _ = distance;
//! # Ok::<(), lexdist::error::LexError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{align, pmi_alignment, Alignment, AlignmentConfig, ScoringPolicy};
    pub use crate::core::{candidate_pairs, reestimate, screen, CandidatePolicy, EstimatorConfig};
    pub use crate::core::{AlignmentMeasure, ConceptDistance, EditDistanceMeasure};
    pub use crate::core::{CharacterFrequencyTable, CognatePair, SubstitutionMatrix};
    pub use crate::core::{RelatedLanguagePair, RelatednessScorer, Screening, VariantMode};
    pub use crate::core::{sample_pairs, TuningObjective, TuningParams};
    pub use crate::data::{Corpus, Language, MatrixFile};
    pub use crate::error::LexError;
    pub use crate::VERSION;
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use crate::core::{AlignmentConfig, RelatednessScorer, SubstitutionMatrix};
pub use data::{Corpus, Language};
pub use error::LexError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "lexdist v{} - Rank-based relatedness distance between languages",
        VERSION
    )
}
