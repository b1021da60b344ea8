// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;

use lexdist::cli::Config;
use lexdist::data::{self, CorpusStats};
use lexdist::output::{write_matrix, write_scores};
use lexdist::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args)?;

    let needs_output = !(args.stats_only || args.dry_run || args.screen_only || args.evaluate);
    let output = if needs_output {
        Some(args.output.clone().ok_or("--output is required")?)
    } else {
        None
    };

    println!("🚀 lexdist v{}", VERSION);

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    let total_start = Instant::now();

    // Load corpus
    let mut corpus = if let Some(path) = &args.corpus {
        let mut corpus = Corpus::from_asjp_file(Path::new(path)).map_err(|e| e.to_string())?;
        let report = corpus.cull();
        println!(
            "🧹 Culled {} languages ({} families emptied)",
            report.removed.len(),
            report.removed_families.len()
        );
        for culled in report.removed.iter().take(10) {
            println!("   - {} ({}): {}", culled.name, culled.family, culled.reason);
        }
        if report.removed.len() > 10 {
            println!("   ... and {} more", report.removed.len() - 10);
        }
        corpus
    } else if let Some(path) = &args.dataset {
        let corpus: Corpus = data::load(Path::new(path)).map_err(|e| e.to_string())?;
        println!(
            "📂 Dataset loaded: {} languages in {} families",
            corpus.language_count(),
            corpus.families.len()
        );
        corpus
    } else {
        return Err("Either --corpus or --dataset is required".to_string());
    };

    if validation.has_filters() {
        let removed = corpus.retain(|family, language| validation.keeps(family, language));
        println!("🔍 Filters removed {} languages, {} remain", removed, corpus.language_count());
    }

    corpus.validate().map_err(|e| format!("Corpus validation failed: {}", e))?;

    if let Some(path) = &args.save_dataset {
        data::save(&corpus, Path::new(path)).map_err(|e| e.to_string())?;
        println!("💾 Dataset saved to: {}", path);
    }

    print_stats(&corpus.stats());
    if args.stats_only {
        return Ok(());
    }
    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    if args.split {
        let (training, test) = corpus.split(args.seed);
        println!(
            "✂️  Split (seed {}): {} training languages, {} held out",
            args.seed,
            training.language_count(),
            test.language_count()
        );
        corpus = training;
    }

    // Screen for probable relatives
    let members = corpus.members();
    let languages: Vec<&Language> = members.iter().map(|(_, language)| *language).collect();
    let screening = screen(&languages, args.theta_derc).map_err(|e| e.to_string())?;

    if let Some(path) = &args.scores {
        write_scores(path, validation.output_format, &screening, &members, &command_line)?;
    }

    let related = screening.related_pairs(&languages);
    if let Some(path) = &args.save_related {
        data::save(&related, Path::new(path)).map_err(|e| e.to_string())?;
        println!("💾 {} related pairs saved to: {}", related.len(), path);
    }

    if args.screen_only {
        println!("✅ Screening completed in {:.2}s", total_start.elapsed().as_secs_f64());
        return Ok(());
    }
    if related.is_empty() {
        return Err(format!(
            "No related language pairs at theta_dERC = {}; raise --theta-derc",
            args.theta_derc
        ));
    }

    // Candidate cognates and the seed matrix
    let candidates = candidate_pairs(related.iter().map(|pair| (&pair.left, &pair.right)))
        .map_err(|e| e.to_string())?;
    println!(
        "🔗 {} candidate cognate pairs from {} related language pairs",
        candidates.len(),
        related.len()
    );
    if let Some(path) = &args.save_candidates {
        data::save(&candidates, Path::new(path)).map_err(|e| e.to_string())?;
        println!("💾 Candidates saved to: {}", path);
    }

    let freq = CharacterFrequencyTable::from_languages(languages.iter().copied())
        .map_err(|e| e.to_string())?;
    let seed = SubstitutionMatrix::seed(&candidates, &freq);
    println!(
        "🌱 Seed matrix: {} entries from {} symbols ({} characters)",
        seed.len(),
        freq.distinct_symbols(),
        freq.total()
    );

    if args.evaluate {
        return run_evaluation(&args, &validation, candidates, freq, seed, &related);
    }

    // Re-estimate
    let estimator = &validation.estimator;
    println!(
        "🔄 Re-estimating matrix: {} rounds, theta_PMI = {}, gaps {}/{}, candidates: {}",
        estimator.iterations,
        estimator.theta,
        estimator.alignment.gap_open,
        estimator.alignment.gap_extend,
        estimator.policy
    );
    let estimate_start = Instant::now();
    let estimation =
        reestimate(&candidates, estimator, &freq, &seed).map_err(|e| e.to_string())?;
    for round in &estimation.rounds {
        println!(
            "   Round {}/{}: {}/{} candidates accepted ({} unique aligned, {} columns, {} pairs)",
            round.round,
            estimator.iterations,
            round.accepted,
            round.candidates,
            round.unique_pairs,
            round.aligned_columns,
            round.observed_pairs
        );
        if round.accepted == 0 {
            eprintln!("⚠️  Round {} accepted no candidates; matrix unchanged", round.round);
        }
    }
    println!(
        "✅ Re-estimation completed in {:.2}s",
        estimate_start.elapsed().as_secs_f64()
    );

    let matrix_file = MatrixFile::new(&estimation.matrix, estimator, args.matrix_note.clone());
    let output_path = output.ok_or("--output is required")?;
    write_matrix(&output_path, &matrix_file, &command_line)?;

    // Print summary
    let total_elapsed = total_start.elapsed();
    println!("\n🎉 === LEXDIST COMPLETED SUCCESSFULLY ===");
    println!("⏱️  Total execution time: {:.2}s", total_elapsed.as_secs_f64());
    println!(
        "📊 Final matrix: {} entries from {} related pairs",
        estimation.matrix.len(),
        related.len()
    );
    println!("📁 Output written to: {}", output_path);
    println!("🔧 Command: {}", command_line);

    Ok(())
}

/// Evaluate the tuning objective at the configured parameters
fn run_evaluation(
    args: &Args,
    validation: &ValidationResult,
    candidates: Vec<CognatePair>,
    freq_table: CharacterFrequencyTable,
    seed_matrix: SubstitutionMatrix,
    related: &[RelatedLanguagePair],
) -> Result<(), String> {
    let evaluation_pairs = sample_pairs(related, args.evaluation_pairs, args.seed);
    println!(
        "📊 Evaluating on {} of {} related pairs (seed {})",
        evaluation_pairs.len(),
        related.len(),
        args.seed
    );

    let objective = TuningObjective {
        candidates,
        freq_table,
        seed_matrix,
        evaluation_pairs,
        iterations: validation.estimator.iterations,
        policy: validation.estimator.policy,
    };
    let params = TuningParams {
        gap_open: args.gap_open,
        gap_extend: args.gap_extend,
        theta_pmi: args.theta_pmi,
    };

    let start = Instant::now();
    let baseline = objective.baseline_ldn().map_err(|e| e.to_string())?;
    let score = objective.evaluate(params).map_err(|e| e.to_string())?;

    println!("   mean dERC/LDN: {:.6}", baseline);
    println!(
        "   mean dERC/PMI: {:.6} (gap_open {}, gap_extend {}, theta_PMI {})",
        score, params.gap_open, params.gap_extend, params.theta_pmi
    );
    println!("✅ Evaluation completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn print_stats(stats: &CorpusStats) {
    println!("📊 Corpus statistics:");
    println!("   Families:      {}", stats.families);
    println!("   Languages:     {}", stats.languages);
    println!("   Concepts:      {}", stats.concepts);
    println!("   Words:         {}", stats.words);
    println!("   Missing slots: {}", stats.missing_slots);
}
