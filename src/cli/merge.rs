// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::core::{AlignmentConfig, EstimatorConfig, DEFAULT_THETA_DERC};

pub const DEFAULT_FORMAT: &str = "tsv";
pub const DEFAULT_CANDIDATE_POLICY: &str = "full";
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_EVALUATION_PAIRS: usize = 1000;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.corpus.is_none() {
            self.corpus = config.corpus;
        }
        if self.dataset.is_none() {
            self.dataset = config.dataset;
        }
        if self.save_dataset.is_none() {
            self.save_dataset = config.save_dataset;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.scores.is_none() {
            self.scores = config.scores;
        }
        if self.save_related.is_none() {
            self.save_related = config.save_related;
        }
        if self.save_candidates.is_none() {
            self.save_candidates = config.save_candidates;
        }
        if self.matrix_note.is_none() {
            self.matrix_note = config.matrix_note;
        }

        // Settings with defaults (only override defaults, not explicit CLI values)
        let alignment = AlignmentConfig::default();
        let estimator = EstimatorConfig::default();
        if let Some(format) = config.format.filter(|_| self.format == DEFAULT_FORMAT) {
            self.format = format;
        }
        if let Some(theta) = config.theta_derc.filter(|_| self.theta_derc == DEFAULT_THETA_DERC) {
            self.theta_derc = theta;
        }
        if let Some(open) = config.gap_open.filter(|_| self.gap_open == alignment.gap_open) {
            self.gap_open = open;
        }
        if let Some(extend) = config.gap_extend.filter(|_| self.gap_extend == alignment.gap_extend) {
            self.gap_extend = extend;
        }
        if let Some(theta) = config.theta_pmi.filter(|_| self.theta_pmi == estimator.theta) {
            self.theta_pmi = theta;
        }
        if let Some(iterations) = config.iterations.filter(|_| self.iterations == estimator.iterations) {
            self.iterations = iterations;
        }
        if let Some(policy) = config
            .candidate_policy
            .filter(|_| self.candidate_policy == DEFAULT_CANDIDATE_POLICY)
        {
            self.candidate_policy = policy;
        }
        if let Some(seed) = config.seed.filter(|_| self.seed == DEFAULT_SEED) {
            self.seed = seed;
        }
        if let Some(pairs) = config
            .evaluation_pairs
            .filter(|_| self.evaluation_pairs == DEFAULT_EVALUATION_PAIRS)
        {
            self.evaluation_pairs = pairs;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Language/family filtering
        if self.include_languages.is_none() {
            self.include_languages = config.include_languages;
        }
        if self.exclude_languages.is_none() {
            self.exclude_languages = config.exclude_languages;
        }
        if self.include_families.is_none() {
            self.include_families = config.include_families;
        }
        if self.exclude_families.is_none() {
            self.exclude_families = config.exclude_families;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.split && config.split.unwrap_or(false) {
            self.split = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["lexdist"], args).unwrap()
    }

    #[test]
    fn test_config_fills_defaults() {
        let config = Config {
            corpus: Some("lists.txt".to_string()),
            theta_derc: Some(0.6),
            iterations: Some(5),
            split: Some(true),
            ..Config::new()
        };
        let args = parse(&[]).merge_with_config(config);
        assert_eq!(args.corpus.as_deref(), Some("lists.txt"));
        assert_eq!(args.theta_derc, 0.6);
        assert_eq!(args.iterations, 5);
        assert!(args.split);
    }

    #[test]
    fn test_explicit_cli_values_win() {
        let config = Config {
            corpus: Some("from_config.txt".to_string()),
            iterations: Some(5),
            candidate_policy: Some("accepted".to_string()),
            ..Config::new()
        };
        let args = parse(&["--corpus", "cli.txt", "--iterations", "3"]).merge_with_config(config);
        assert_eq!(args.corpus.as_deref(), Some("cli.txt"));
        assert_eq!(args.iterations, 3);
        assert_eq!(args.candidate_policy, "accepted");
    }
}
