// validation.rs - Input validation utilities

use std::str::FromStr;

use regex::Regex;

use crate::cli::args::Args;
use crate::core::{AlignmentConfig, CandidatePolicy, EstimatorConfig};
use crate::data::Language;
use crate::output::OutputFormat;

pub struct ValidationResult {
    pub output_format: OutputFormat,
    pub estimator: EstimatorConfig,
    pub language_include_regex: Option<Regex>,
    pub language_exclude_regex: Option<Regex>,
    pub family_include_regex: Option<Regex>,
    pub family_exclude_regex: Option<Regex>,
}

impl ValidationResult {
    pub fn has_filters(&self) -> bool {
        self.language_include_regex.is_some()
            || self.language_exclude_regex.is_some()
            || self.family_include_regex.is_some()
            || self.family_exclude_regex.is_some()
    }

    /// Whether a language survives the include/exclude patterns
    pub fn keeps(&self, family: &str, language: &Language) -> bool {
        let name = language.name.as_str();
        self.language_include_regex.as_ref().map_or(true, |r| r.is_match(name))
            && !self.language_exclude_regex.as_ref().is_some_and(|r| r.is_match(name))
            && self.family_include_regex.as_ref().map_or(true, |r| r.is_match(family))
            && !self.family_exclude_regex.as_ref().is_some_and(|r| r.is_match(family))
    }
}

fn compile(pattern: &Option<String>, name: &str) -> Result<Option<Regex>, String> {
    pattern
        .as_deref()
        .map(|p| Regex::new(p).map_err(|e| format!("Invalid {} regex: {}", name, e)))
        .transpose()
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Exactly one corpus source
    match (&args.corpus, &args.dataset) {
        (None, None) => return Err("Either --corpus or --dataset is required".to_string()),
        (Some(_), Some(_)) => {
            return Err("--corpus and --dataset are mutually exclusive".to_string())
        }
        _ => {}
    }

    let output_format = OutputFormat::from_str(&args.format)?;
    let policy = CandidatePolicy::from_str(&args.candidate_policy)?;

    // Validate thresholds
    if !(0.0..=1.0).contains(&args.theta_derc) {
        return Err("theta_derc must be between 0.0 and 1.0".to_string());
    }
    if !args.theta_pmi.is_finite() {
        return Err("theta_pmi must be a finite number".to_string());
    }
    for (name, value) in [("gap_open", args.gap_open), ("gap_extend", args.gap_extend)] {
        if !value.is_finite() || value > 0.0 {
            return Err(format!("{} must be finite and <= 0 (got {})", name, value));
        }
    }

    if args.threads == Some(0) {
        return Err("--threads must be at least 1".to_string());
    }
    if args.evaluate && args.evaluation_pairs == 0 {
        return Err("--evaluate requires --evaluation-pairs > 0".to_string());
    }
    if args.iterations == 0 {
        eprintln!("⚠️  --iterations 0: the seed matrix will be written unchanged");
    }

    let estimator = EstimatorConfig {
        alignment: AlignmentConfig::custom(args.gap_open, args.gap_extend),
        theta: args.theta_pmi,
        iterations: args.iterations,
        policy,
    };

    Ok(ValidationResult {
        output_format,
        estimator,
        language_include_regex: compile(&args.include_languages, "include_languages")?,
        language_exclude_regex: compile(&args.exclude_languages, "exclude_languages")?,
        family_include_regex: compile(&args.include_families, "include_families")?,
        family_exclude_regex: compile(&args.exclude_families, "exclude_families")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["lexdist"], args).unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        let result = validate_args(&parse(&["--corpus", "lists.txt"])).unwrap();
        assert_eq!(result.output_format, OutputFormat::Tsv);
        assert_eq!(result.estimator.iterations, 11);
        assert_eq!(result.estimator.policy, CandidatePolicy::FullSet);
        assert!(!result.has_filters());
    }

    #[test]
    fn test_corpus_source_is_required_and_exclusive() {
        assert!(validate_args(&parse(&[])).is_err());
        assert!(validate_args(&parse(&["--corpus", "a.txt", "--dataset", "b.json"])).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(validate_args(&parse(&["--corpus", "a", "--theta-derc", "1.5"])).is_err());
        assert!(validate_args(&parse(&["--corpus", "a", "--gap-open", "2"])).is_err());
        assert!(validate_args(&parse(&["--corpus", "a", "--format", "xlsx"])).is_err());
        assert!(validate_args(&parse(&["--corpus", "a", "--candidate-policy", "some"])).is_err());
        assert!(validate_args(&parse(&["--corpus", "a", "--include-languages", "("])).is_err());
    }

    #[test]
    fn test_filters() {
        let result = validate_args(&parse(&[
            "--corpus",
            "a",
            "--include-families",
            "^IE$",
            "--exclude-languages",
            "OLD",
        ]))
        .unwrap();
        let german = Language::new("GERMAN", vec![]);
        let old_english = Language::new("OLD_ENGLISH", vec![]);
        assert!(result.keeps("IE", &german));
        assert!(!result.keeps("IE", &old_english));
        assert!(!result.keeps("Ura", &german));
    }
}
