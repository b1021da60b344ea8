// relatedness.rs - Rank-based relatedness distance (dERC) between two languages

use crate::core::alphabet::{attested, is_missing_slot};
use crate::core::edit_distance::VariantMode;
use crate::core::measure::ConceptDistance;
use crate::data::Language;
use crate::error::{LexError, Result};

/// Intermediate quantities of one dERC computation
#[derive(Debug, Clone, PartialEq)]
pub struct RelatednessBreakdown {
    /// Calibrated distance; 0 = strongest relatedness signal, 1 = none
    pub distance: f64,
    /// Concepts attested in both languages
    pub on_diagonal: usize,
    pub off_diagonal: usize,
    /// Full concept-slot count
    pub concepts: usize,
    pub er: f64,
    pub erc: f64,
    pub erc_max: f64,
    pub erc_min: f64,
}

impl RelatednessBreakdown {
    fn no_signal(concepts: usize, off_diagonal: usize) -> Self {
        Self {
            distance: 1.0,
            on_diagonal: 0,
            off_diagonal,
            concepts,
            er: 0.0,
            erc: 0.0,
            erc_max: 0.0,
            erc_min: 0.0,
        }
    }
}

/// Reject language pairs whose word lists do not share one concept inventory
pub fn check_comparable(l1: &Language, l2: &Language) -> Result<()> {
    if l1.word_list.len() != l2.word_list.len() {
        return Err(LexError::SlotCountMismatch {
            left: l1.name.clone(),
            left_slots: l1.word_list.len(),
            right: l2.name.clone(),
            right_slots: l2.word_list.len(),
        });
    }
    Ok(())
}

/// Log of the normalized rank of `value` within `sorted` (ascending).
///
/// With `lo` values strictly below and `hi` values at or below `value`, the
/// rank is the geometric mean of `v / (len + 1)` for `v` in `lo+1 ..= hi+1`,
/// which spreads ties evenly across the positions they occupy.
pub fn log_normalized_rank(value: f64, sorted: &[f64]) -> f64 {
    let lo = sorted.partition_point(|&x| x < value);
    let hi = sorted.partition_point(|&x| x <= value);
    let tied = (hi - lo + 1) as f64;
    let denominator = (sorted.len() + 1) as f64;

    (lo + 1..=hi + 1)
        .map(|v| (v as f64 / denominator).ln() / tied)
        .sum()
}

pub fn normalized_rank(value: f64, sorted: &[f64]) -> f64 {
    log_normalized_rank(value, sorted).exp()
}

/// Computes dERC between language pairs with a pluggable per-concept distance
#[derive(Debug, Clone, Copy)]
pub struct RelatednessScorer<'m> {
    measure: &'m dyn ConceptDistance,
}

impl<'m> RelatednessScorer<'m> {
    pub fn new(measure: &'m dyn ConceptDistance) -> Self {
        Self { measure }
    }

    pub fn measure_name(&self) -> &'static str {
        self.measure.name()
    }

    /// dERC distance between two languages.
    ///
    /// Nominally in [0, 1]; rounding can leave identical languages a few ulps
    /// below 0.
    pub fn score(&self, l1: &Language, l2: &Language) -> Result<f64> {
        Ok(self.score_detailed(l1, l2)?.distance)
    }

    pub fn score_detailed(&self, l1: &Language, l2: &Language) -> Result<RelatednessBreakdown> {
        check_comparable(l1, l2)?;
        l1.validate()?;
        l2.validate()?;

        // Attested variants per slot, None where the slot is missing
        let slots1: Vec<Option<Vec<&str>>> = l1.word_list.iter().map(|s| usable(s)).collect();
        let slots2: Vec<Option<Vec<&str>>> = l2.word_list.iter().map(|s| usable(s)).collect();
        let concepts = slots1.len();

        let mut on_diagonal = Vec::new();
        for (s1, s2) in slots1.iter().zip(&slots2) {
            if let (Some(v1), Some(v2)) = (s1, s2) {
                on_diagonal.push(self.measure.distance(v1, v2, VariantMode::Best)?);
            }
        }

        let mut off_diagonal = Vec::new();
        for (i, s1) in slots1.iter().enumerate() {
            let Some(v1) = s1 else { continue };
            for (j, s2) in slots2.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(v2) = s2 {
                    off_diagonal.push(self.measure.distance(v1, v2, VariantMode::Average)?);
                }
            }
        }
        off_diagonal.sort_by(|a, b| a.total_cmp(b));

        let n = on_diagonal.len();
        if n == 0 {
            return Ok(RelatednessBreakdown::no_signal(concepts, off_diagonal.len()));
        }

        let er = -on_diagonal
            .iter()
            .map(|&d| log_normalized_rank(d, &off_diagonal))
            .sum::<f64>()
            / n as f64;
        let erc = (n as f64).sqrt() * (er - 1.0);

        // Bounds for a full word list whose diagonal ranks lowest everywhere
        let n_max = concepts as f64;
        let er_max = (n_max * n_max - n_max + 1.0).ln();
        let er_min = 0.0;
        let erc_max = n_max.sqrt() * (er_max - 1.0);
        let erc_min = n_max.sqrt() * (er_min - 1.0);

        let span = erc_max - erc_min;
        if span <= 0.0 {
            // A single concept cannot separate related from unrelated pairs
            return Ok(RelatednessBreakdown::no_signal(concepts, off_diagonal.len()));
        }

        Ok(RelatednessBreakdown {
            distance: (erc_max - erc) / span,
            on_diagonal: n,
            off_diagonal: off_diagonal.len(),
            concepts,
            er,
            erc,
            erc_max,
            erc_min,
        })
    }
}

fn usable(slot: &[String]) -> Option<Vec<&str>> {
    if is_missing_slot(slot) {
        None
    } else {
        Some(attested(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measure::EditDistanceMeasure;
    use crate::data::Language;

    fn language(name: &str, words: &[&[&str]]) -> Language {
        Language::new(
            name,
            words
                .iter()
                .map(|slot| slot.iter().map(|w| w.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_normalized_rank() {
        let sorted = [1.0, 3.0, 5.0, 7.0, 9.0];
        // lo = 2, hi = 3, two positions tied
        let expected = ((3.0f64 / 6.0) * (4.0 / 6.0)).sqrt();
        assert!((normalized_rank(5.0, &sorted) - expected).abs() < 1e-12);
        // Below every entry
        assert!((normalized_rank(0.0, &sorted) - 1.0 / 6.0).abs() < 1e-12);
        // Above every entry
        assert!((normalized_rank(10.0, &sorted) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_languages_score_zero() {
        let l = language(
            "A",
            &[&["kat"], &["hund"], &["vasr"], &["mano"], &["sol"]],
        );
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        let distance = scorer.score(&l, &l.clone()).unwrap();
        assert!(distance.abs() < 1e-9, "distance = {}", distance);
    }

    #[test]
    fn test_unknown_symbol_is_rejected() {
        let a = language("A", &[&["ka#t"], &["hund"], &["sol"]]);
        let b = language("B", &[&["kat"], &["hunt"], &["sul"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        assert_eq!(scorer.measure_name(), "LDN");
        assert!(matches!(
            scorer.score(&a, &b),
            Err(LexError::UnknownSymbol { symbol: '#', .. })
        ));
        assert!(matches!(
            scorer.score(&b, &a),
            Err(LexError::UnknownSymbol { symbol: '#', .. })
        ));
    }

    #[test]
    fn test_two_concept_scenario() {
        let a = language("A", &[&["kat"], &["hund"]]);
        let b = language("B", &[&["kat"], &["hunt"]]);
        let c = language("C", &[&["zzz"], &["yyyy"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);

        let related = scorer.score_detailed(&a, &b).unwrap();
        assert_eq!(related.on_diagonal, 2);
        assert_eq!(related.off_diagonal, 2);
        assert!(related.distance.abs() < 1e-9);

        let unrelated = scorer.score(&a, &c).unwrap();
        assert!(unrelated > related.distance);
        assert!((unrelated - 0.5436).abs() < 1e-3, "unrelated = {}", unrelated);
    }

    #[test]
    fn test_no_shared_concepts_scores_one() {
        let a = language("A", &[&["kat"], &["XXX"]]);
        let b = language("B", &[&["XXX"], &["hund"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        assert_eq!(scorer.score(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_variants_inside_slot_are_ignored() {
        let a = language("A", &[&["kat", "XXX"], &["hund"], &["sol"]]);
        let b = language("B", &[&["kat"], &["hund"], &["sol"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        let breakdown = scorer.score_detailed(&a, &b).unwrap();
        assert_eq!(breakdown.on_diagonal, 3);
        assert!(breakdown.distance.abs() < 1e-9);
    }

    #[test]
    fn test_slot_count_mismatch_is_rejected() {
        let a = language("A", &[&["kat"], &["hund"]]);
        let b = language("B", &[&["kat"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        assert!(matches!(
            scorer.score(&a, &b),
            Err(LexError::SlotCountMismatch { left_slots: 2, right_slots: 1, .. })
        ));
    }

    #[test]
    fn test_single_concept_has_no_signal() {
        let a = language("A", &[&["kat"]]);
        let measure = EditDistanceMeasure;
        let scorer = RelatednessScorer::new(&measure);
        assert_eq!(scorer.score(&a, &a).unwrap(), 1.0);
    }
}
