// screener.rs - dERC/LDN fan-out over every language pair of a corpus

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::measure::{ConceptDistance, EditDistanceMeasure};
use crate::core::relatedness::{check_comparable, RelatednessScorer};
use crate::data::Language;
use crate::error::Result;

/// Default dERC cut-off for calling a pair related
pub const DEFAULT_THETA_DERC: f64 = 0.70;

/// dERC/LDN of one unordered language pair, by index into the screened slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

/// Two languages judged related, stored with their full word lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedLanguagePair {
    pub left: Language,
    pub right: Language,
    pub distance: f64,
}

/// Every computed pair score plus the threshold that separates related pairs
#[derive(Debug, Clone)]
pub struct Screening {
    pub scores: Vec<PairScore>,
    pub theta: f64,
}

impl Screening {
    pub fn is_related(&self, score: &PairScore) -> bool {
        score.distance <= self.theta
    }

    pub fn related(&self) -> impl Iterator<Item = &PairScore> + '_ {
        self.scores.iter().filter(move |s| self.is_related(s))
    }

    pub fn related_count(&self) -> usize {
        self.related().count()
    }

    /// Raw distance of every screened pair, in pair order
    pub fn distances(&self) -> Vec<f64> {
        self.scores.iter().map(|s| s.distance).collect()
    }

    /// Materialize the related pairs against the slice that was screened
    pub fn related_pairs(&self, languages: &[&Language]) -> Vec<RelatedLanguagePair> {
        self.related()
            .map(|s| RelatedLanguagePair {
                left: languages[s.left].clone(),
                right: languages[s.right].clone(),
                distance: s.distance,
            })
            .collect()
    }
}

pub(crate) fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Score every unordered pair of `languages` with dERC/LDN.
///
/// All word lists must share one concept inventory and be written in the
/// phonetic alphabet; both are checked before any pair is scored.
pub fn screen(languages: &[&Language], theta: f64) -> Result<Screening> {
    if let Some(first) = languages.first() {
        for other in &languages[1..] {
            check_comparable(first, other)?;
        }
    }
    for language in languages {
        language.validate()?;
    }

    let n = languages.len();
    let total = n * n.saturating_sub(1) / 2;
    let start = Instant::now();
    let measure = EditDistanceMeasure;
    let scorer = RelatednessScorer::new(&measure);
    println!(
        "🔄 Screening {} languages ({} pairs) with dERC/{} ({}), theta = {:.2}",
        n,
        total,
        scorer.measure_name(),
        measure.description(),
        theta
    );

    let pb = progress_bar(total);
    let update_interval = std::cmp::max(1, total / 100);
    let counter = Arc::new(AtomicUsize::new(0));

    let mut scores = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            let counter = counter.clone();
            let pb = pb.clone();
            let scorer = scorer;
            (i + 1..n).into_par_iter().map(move |j| {
                let distance = scorer.score(languages[i], languages[j]);

                let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
                if done % update_interval == 0 {
                    pb.set_position(done as u64);
                }

                distance.map(|distance| PairScore {
                    left: i,
                    right: j,
                    distance,
                })
            })
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_with_message("✅ Screening completed!");
    scores.sort_by_key(|s| (s.left, s.right));

    let screening = Screening { scores, theta };
    println!(
        "✅ {} of {} pairs related (dERC <= {:.2}) in {:.2}s",
        screening.related_count(),
        total,
        theta,
        start.elapsed().as_secs_f64()
    );
    Ok(screening)
}
