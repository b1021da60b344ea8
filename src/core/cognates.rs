// cognates.rs - Candidate cognate selection between related languages

use serde::{Deserialize, Serialize};

use crate::core::alphabet::is_missing;
use crate::core::edit_distance::normalized_distance;
use crate::core::relatedness::check_comparable;
use crate::data::Language;
use crate::error::Result;

/// Two words, one per language, hypothesized to share an origin
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CognatePair {
    pub word1: String,
    pub word2: String,
}

impl CognatePair {
    pub fn new(word1: impl Into<String>, word2: impl Into<String>) -> Self {
        Self {
            word1: word1.into(),
            word2: word2.into(),
        }
    }

    /// Same pair with the two words in sorted order
    pub fn canonical(&self) -> Self {
        if self.word1 <= self.word2 {
            self.clone()
        } else {
            Self::new(self.word2.clone(), self.word1.clone())
        }
    }
}

/// Closest variant pair between two concept slots by normalized edit distance.
///
/// Missing markers are never selected. Returns `None` when either slot has no
/// attested word. Ties go to the first pair in variant order.
pub fn select(slot1: &[String], slot2: &[String]) -> Option<CognatePair> {
    let mut best: Option<(f64, &str, &str)> = None;
    for w1 in slot1.iter().filter(|w| !is_missing(w)) {
        for w2 in slot2.iter().filter(|w| !is_missing(w)) {
            let d = normalized_distance(w1, w2);
            if best.map_or(true, |(current, _, _)| d < current) {
                best = Some((d, w1.as_str(), w2.as_str()));
            }
        }
    }
    best.map(|(_, w1, w2)| CognatePair::new(w1, w2))
}

/// Candidate cognates for every concept of every language pair, in pair order
pub fn candidate_pairs<'a, I>(pairs: I) -> Result<Vec<CognatePair>>
where
    I: IntoIterator<Item = (&'a Language, &'a Language)>,
{
    let mut candidates = Vec::new();
    for (l1, l2) in pairs {
        check_comparable(l1, l2)?;
        candidates.extend(
            l1.word_list
                .iter()
                .zip(&l2.word_list)
                .filter_map(|(s1, s2)| select(s1, s2)),
        );
    }
    Ok(candidates)
}
