// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub corpus: Option<String>,
    pub dataset: Option<String>,
    pub save_dataset: Option<String>,
    pub output: Option<String>,
    pub scores: Option<String>,
    pub format: Option<String>,
    pub save_related: Option<String>,
    pub save_candidates: Option<String>,

    // Screening
    pub theta_derc: Option<f64>,

    // Matrix estimation
    pub gap_open: Option<f64>,
    pub gap_extend: Option<f64>,
    pub theta_pmi: Option<f64>,
    pub iterations: Option<usize>,
    pub candidate_policy: Option<String>,
    pub matrix_note: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Sampling
    pub split: Option<bool>,
    pub seed: Option<u64>,
    pub evaluation_pairs: Option<usize>,

    // Language/family filtering
    pub include_languages: Option<String>,
    pub exclude_languages: Option<String>,
    pub include_families: Option<String>,
    pub exclude_families: Option<String>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# lexdist.toml - Configuration file for lexdist
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# ASJP word list file (languages are culled after loading)
corpus = "/path/to/lists.txt"

# Or a corpus dataset saved by a previous run (.json or .json.lz4)
# dataset = "corpus.json.lz4"

# Save the loaded and filtered corpus
# save_dataset = "corpus.json.lz4"

# Output substitution matrix (.json, .lz4 or .tsv)
output = "pmi_matrix.json"

# Screening scores for every language pair
# scores = "screening.tsv"

# Score file format: tsv, csv
format = "tsv"

# Intermediate datasets
# save_related = "related_pairs.json.lz4"
# save_candidates = "cognates.json.lz4"

# =============================================================================
# SCREENING
# =============================================================================

# dERC/LDN threshold for calling a language pair related (0.0-1.0)
theta_derc = 0.70

# =============================================================================
# MATRIX ESTIMATION
# =============================================================================

# Gap scores for substitution alignment (finite, <= 0)
gap_open = -2.4166728
gap_extend = -1.51569227

# Minimum alignment score for a candidate to count as cognate evidence
theta_pmi = 5.59488733

# Number of re-estimation rounds
iterations = 11

# Candidates re-aligned after each round: full, accepted
candidate_policy = "full"

# User note saved with the matrix
# matrix_note = "ASJP v20, training half"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 8

# =============================================================================
# SAMPLING
# =============================================================================

# Restrict the run to the training half of a family-preserving split
split = false

# Random seed for the split and for evaluation sampling
seed = 42

# Related pairs sampled when evaluating the tuning objective
evaluation_pairs = 1000

# =============================================================================
# LANGUAGE/FAMILY FILTERING
# =============================================================================

# include_languages = "^STANDARD_.*"
# exclude_languages = "_DIALECT$"
# include_families = "^(IE|Ura)$"
# exclude_families = "^Pid$"

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs without computation (dry run)
dry_run = false
"#
        .to_string()
    }
}
