// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// lexdist - Language relatedness from basic vocabulary word lists
pub struct Args {
    /// path to ASJP word list file (culled after loading)
    #[argh(option)]
    pub corpus: Option<String>,

    /// path to a saved corpus dataset (.json or .json.lz4)
    #[argh(option)]
    pub dataset: Option<String>,

    /// save the loaded and filtered corpus as a dataset (.json or .json.lz4)
    #[argh(option)]
    pub save_dataset: Option<String>,

    /// output substitution matrix file (.json, .lz4 or .tsv)
    #[argh(option)]
    pub output: Option<String>,

    /// write screening scores for every language pair to this file
    #[argh(option)]
    pub scores: Option<String>,

    /// score file format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// save related language pairs found by screening (.json or .json.lz4)
    #[argh(option)]
    pub save_related: Option<String>,

    /// save candidate cognate pairs (.json or .json.lz4)
    #[argh(option)]
    pub save_candidates: Option<String>,

    /// dERC/LDN threshold for calling a language pair related (default: 0.70)
    #[argh(option, default = "0.70")]
    pub theta_derc: f64,

    /// gap open score for substitution alignment (default: -2.4166728)
    #[argh(option, default = "-2.4166728")]
    pub gap_open: f64,

    /// gap extend score for substitution alignment (default: -1.51569227)
    #[argh(option, default = "-1.51569227")]
    pub gap_extend: f64,

    /// minimum alignment score for a candidate to count as cognate evidence (default: 5.59488733)
    #[argh(option, default = "5.59488733")]
    pub theta_pmi: f64,

    /// number of re-estimation rounds (default: 11)
    #[argh(option, default = "11")]
    pub iterations: usize,

    /// candidates re-aligned after each round: full, accepted (default: full)
    #[argh(option, default = "String::from(\"full\")")]
    pub candidate_policy: String,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// restrict the run to the training half of a family-preserving split
    #[argh(switch)]
    pub split: bool,

    /// random seed for the split and for evaluation sampling (default: 42)
    #[argh(option, default = "42")]
    pub seed: u64,

    /// evaluate the tuning objective at the given parameters and exit
    #[argh(switch)]
    pub evaluate: bool,

    /// number of related pairs sampled for evaluation (default: 1000)
    #[argh(option, default = "1000")]
    pub evaluation_pairs: usize,

    /// stop after screening
    #[argh(switch)]
    pub screen_only: bool,

    /// show corpus statistics only, then exit
    #[argh(switch)]
    pub stats_only: bool,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// include only languages whose name matches regex pattern
    #[argh(option)]
    pub include_languages: Option<String>,

    /// exclude languages whose name matches regex pattern
    #[argh(option)]
    pub exclude_languages: Option<String>,

    /// include only families matching regex pattern
    #[argh(option)]
    pub include_families: Option<String>,

    /// exclude families matching regex pattern
    #[argh(option)]
    pub exclude_families: Option<String>,

    /// user note to save with the substitution matrix
    #[argh(option)]
    pub matrix_note: Option<String>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
