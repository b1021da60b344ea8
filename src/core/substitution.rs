// substitution.rs - Symbol-pair log-odds matrix and character frequencies

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::alignment::Alignment;
use crate::core::alphabet::{attested, validate_word, GAP};
use crate::data::Language;
use crate::error::{LexError, Result};

/// Unordered pair of phonetic symbols, stored sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolPair(char, char);

impl SymbolPair {
    pub fn new(a: char, b: char) -> Self {
        if a <= b {
            SymbolPair(a, b)
        } else {
            SymbolPair(b, a)
        }
    }

    pub fn first(&self) -> char {
        self.0
    }

    pub fn second(&self) -> char {
        self.1
    }

    /// String key used in persisted matrices ("a:b")
    pub fn key(&self) -> String {
        format!("{}:{}", self.0, self.1)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let a = chars.next()?;
        if chars.next()? != ':' {
            return None;
        }
        let b = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(SymbolPair::new(a, b))
    }
}

/// Occurrence counts of every phonetic symbol in a reference corpus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterFrequencyTable {
    counts: BTreeMap<char, u64>,
    total: u64,
}

impl CharacterFrequencyTable {
    /// Count every character of every attested word. Missing markers are skipped;
    /// a character outside the alphabet is an error.
    pub fn from_languages<'a, I>(languages: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Language>,
    {
        let mut table = Self::default();
        for language in languages {
            for slot in &language.word_list {
                for word in attested(slot) {
                    validate_word(word, &language.name)?;
                    for c in word.chars() {
                        *table.counts.entry(c).or_insert(0) += 1;
                        table.total += 1;
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (char, u64)>) -> Self {
        let counts: BTreeMap<char, u64> = counts.into_iter().collect();
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn count(&self, symbol: char) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Relative frequency of `symbol`, 0 when unseen
    pub fn probability(&self, symbol: char) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(symbol) as f64 / self.total as f64
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.len()
    }
}

/// Co-occurrence tally of aligned non-gap symbol pairs
#[derive(Debug, Clone, Default)]
pub struct PairCounts {
    counts: HashMap<SymbolPair, u64>,
    total: u64,
}

impl PairCounts {
    /// Add every column of `alignment` where neither side is a gap
    pub fn add_alignment(&mut self, alignment: &Alignment) {
        for (a, b) in alignment.columns() {
            if a == GAP || b == GAP {
                continue;
            }
            *self.counts.entry(SymbolPair::new(a, b)).or_insert(0) += 1;
            self.total += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct_pairs(&self) -> usize {
        self.counts.len()
    }

    pub fn get(&self, pair: SymbolPair) -> u64 {
        self.counts.get(&pair).copied().unwrap_or(0)
    }
}

/// Log-odds substitution scores over unordered symbol pairs.
///
/// Lookups of pairs that were never estimated resolve to 0.0, the neutral score.
/// That default is the policy, not a missing-data error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionMatrix {
    scores: HashMap<SymbolPair, f64>,
}

impl SubstitutionMatrix {
    pub const NEUTRAL_SCORE: f64 = 0.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, a: char, b: char) -> f64 {
        self.scores
            .get(&SymbolPair::new(a, b))
            .copied()
            .unwrap_or(Self::NEUTRAL_SCORE)
    }

    pub fn get(&self, a: char, b: char) -> Option<f64> {
        self.scores.get(&SymbolPair::new(a, b)).copied()
    }

    pub fn set(&mut self, a: char, b: char, score: f64) {
        self.scores.insert(SymbolPair::new(a, b), score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries sorted by pair
    pub fn entries(&self) -> Vec<(SymbolPair, f64)> {
        let mut entries: Vec<_> = self.scores.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Copy of this matrix with every pair in `counts` replaced by its log-odds ratio
    ///
    /// `log((joint / total_pairs) / (p(a) * p(b)))`. Pairs absent from `counts` keep
    /// their previous score. With no counted pairs the matrix is returned unchanged,
    /// and a pair involving a symbol the frequency table has never seen is skipped.
    pub fn with_log_odds(&self, counts: &PairCounts, freq: &CharacterFrequencyTable) -> Self {
        let mut updated = self.clone();
        if counts.total == 0 {
            return updated;
        }
        let total = counts.total as f64;
        for (pair, joint) in &counts.counts {
            let expected = freq.probability(pair.0) * freq.probability(pair.1);
            if expected <= 0.0 {
                continue;
            }
            let observed = *joint as f64 / total;
            updated.scores.insert(*pair, (observed / expected).ln());
        }
        updated
    }

    pub fn to_keyed(&self) -> BTreeMap<String, f64> {
        self.scores.iter().map(|(k, v)| (k.key(), *v)).collect()
    }

    pub fn from_keyed(entries: &BTreeMap<String, f64>) -> Result<Self> {
        let mut matrix = Self::new();
        for (key, score) in entries {
            let pair = SymbolPair::from_key(key).ok_or_else(|| {
                LexError::InvalidParameter(format!("malformed matrix key '{}'", key))
            })?;
            matrix.scores.insert(pair, *score);
        }
        Ok(matrix)
    }
}

impl Serialize for SubstitutionMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_keyed().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SubstitutionMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = BTreeMap::<String, f64>::deserialize(deserializer)?;
        SubstitutionMatrix::from_keyed(&entries).map_err(serde::de::Error::custom)
    }
}
