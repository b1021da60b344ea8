// language.rs - Word lists, corpora and their curation

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::alphabet::{is_missing, is_missing_slot, is_phonetic_symbol, validate_word};
use crate::core::relatedness::check_comparable;
use crate::error::{LexError, Result};

/// A language's basic vocabulary, one slot per concept of the shared inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub word_list: Vec<Vec<String>>,
}

impl Language {
    pub fn new(name: impl Into<String>, word_list: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            word_list,
        }
    }

    /// Every word must be written in the phonetic alphabet
    pub fn validate(&self) -> Result<()> {
        for word in self.word_list.iter().flatten() {
            validate_word(word, &self.name)?;
        }
        Ok(())
    }

    /// Number of missing markers across all slots
    pub fn missing_words(&self) -> usize {
        self.word_list.iter().flatten().filter(|w| is_missing(w)).count()
    }

    pub fn missing_slots(&self) -> usize {
        self.word_list.iter().filter(|s| is_missing_slot(s)).count()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.word_list)
    }
}

/// Why a language was dropped from the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CullReason {
    /// Member of the catch-all "Oth" family
    UnclassifiedFamily,
    /// Reconstructed or historical stage (PROTO, OLD, numbered variant)
    Historical,
    IllegalSymbol(char),
    TooManyMissing(usize),
}

impl fmt::Display for CullReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CullReason::UnclassifiedFamily => write!(f, "unclassified family"),
            CullReason::Historical => write!(f, "historical or reconstructed variety"),
            CullReason::IllegalSymbol(c) => write!(f, "illegal symbol '{}'", c),
            CullReason::TooManyMissing(n) => write!(f, "{} missing words", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CulledLanguage {
    pub family: String,
    pub name: String,
    pub reason: CullReason,
}

/// Languages and families removed by `Corpus::cull`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CullReport {
    pub removed: Vec<CulledLanguage>,
    pub removed_families: Vec<String>,
}

/// Languages with at least this many missing words are culled
pub const MAX_MISSING_WORDS: usize = 10;

const UNCLASSIFIED_FAMILY: &str = "Oth";

fn cull_reason(family: &str, language: &Language) -> Option<CullReason> {
    if family == UNCLASSIFIED_FAMILY {
        return Some(CullReason::UnclassifiedFamily);
    }
    let name = &language.name;
    if name.contains("PROTO")
        || name.contains("OLD")
        || name.chars().last().is_some_and(|c| c.is_ascii_digit())
    {
        return Some(CullReason::Historical);
    }
    let illegal = language
        .word_list
        .iter()
        .flatten()
        .filter(|w| !is_missing(w))
        .flat_map(|w| w.chars())
        .find(|c| !is_phonetic_symbol(*c));
    if let Some(c) = illegal {
        return Some(CullReason::IllegalSymbol(c));
    }
    let missing = language.missing_words();
    if missing >= MAX_MISSING_WORDS {
        return Some(CullReason::TooManyMissing(missing));
    }
    None
}

/// Summary counts for `--stats-only`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusStats {
    pub families: usize,
    pub languages: usize,
    pub concepts: usize,
    pub words: usize,
    pub missing_slots: usize,
}

/// Languages grouped by family plus the concept inventory they share
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub families: BTreeMap<String, Vec<Language>>,
    /// Concept number to gloss; slot `i` holds the `i`-th concept in ascending order
    pub glosses: BTreeMap<usize, String>,
}

impl Corpus {
    pub fn new(families: BTreeMap<String, Vec<Language>>, glosses: BTreeMap<usize, String>) -> Self {
        Self { families, glosses }
    }

    /// All languages, grouped by family in family order
    pub fn languages(&self) -> Vec<&Language> {
        self.families.values().flatten().collect()
    }

    /// (family, language) for every language
    pub fn members(&self) -> Vec<(&str, &Language)> {
        self.families
            .iter()
            .flat_map(|(family, languages)| languages.iter().map(move |l| (family.as_str(), l)))
            .collect()
    }

    pub fn language_count(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }

    /// Check the alphabet of every word and that all languages share one
    /// concept inventory (the gloss count when glosses are known).
    pub fn validate(&self) -> Result<()> {
        let languages = self.languages();
        let Some(first) = languages.first() else {
            return Ok(());
        };
        if !self.glosses.is_empty() && first.word_list.len() != self.glosses.len() {
            return Err(LexError::SlotCountMismatch {
                left: "concept inventory".to_string(),
                left_slots: self.glosses.len(),
                right: first.name.clone(),
                right_slots: first.word_list.len(),
            });
        }
        for language in &languages {
            check_comparable(first, language)?;
            language.validate()?;
        }
        Ok(())
    }

    /// Drop languages unfit for analysis, then families left empty
    pub fn cull(&mut self) -> CullReport {
        let mut report = CullReport::default();
        for (family, languages) in self.families.iter_mut() {
            languages.retain(|language| match cull_reason(family, language) {
                Some(reason) => {
                    report.removed.push(CulledLanguage {
                        family: family.clone(),
                        name: language.name.clone(),
                        reason,
                    });
                    false
                }
                None => true,
            });
        }
        report.removed_families = self.drop_empty_families();
        report
    }

    /// Keep the languages for which `keep(family, language)` holds; returns how
    /// many were removed
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, &Language) -> bool,
    {
        let before = self.language_count();
        for (family, languages) in self.families.iter_mut() {
            languages.retain(|l| keep(family.as_str(), l));
        }
        self.drop_empty_families();
        before - self.language_count()
    }

    fn drop_empty_families(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .families
            .iter()
            .filter(|(_, languages)| languages.is_empty())
            .map(|(family, _)| family.clone())
            .collect();
        for family in &empty {
            self.families.remove(family);
        }
        empty
    }

    /// Split into (training, test) halves without breaking up families.
    ///
    /// Families are visited in a seeded random order; each goes to the training
    /// half if it still fits within half of all languages, otherwise to the test half.
    pub fn split(&self, seed: u64) -> (Corpus, Corpus) {
        let mut order: Vec<&String> = self.families.keys().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let half = self.language_count() / 2;
        let mut training = Corpus::new(BTreeMap::new(), self.glosses.clone());
        let mut test = Corpus::new(BTreeMap::new(), self.glosses.clone());
        let mut count = 0;

        for family in order {
            let languages = &self.families[family];
            if count + languages.len() <= half {
                count += languages.len();
                training.families.insert(family.clone(), languages.clone());
            } else {
                test.families.insert(family.clone(), languages.clone());
            }
        }
        (training, test)
    }

    pub fn stats(&self) -> CorpusStats {
        let languages = self.languages();
        CorpusStats {
            families: self.families.len(),
            languages: languages.len(),
            concepts: self
                .glosses
                .len()
                .max(languages.first().map_or(0, |l| l.word_list.len())),
            words: languages
                .iter()
                .flat_map(|l| l.word_list.iter().flatten())
                .filter(|w| !is_missing(w))
                .count(),
            missing_slots: languages.iter().map(|l| l.missing_slots()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(name: &str, words: &[&str]) -> Language {
        Language::new(name, words.iter().map(|w| vec![w.to_string()]).collect())
    }

    fn corpus() -> Corpus {
        let mut families = BTreeMap::new();
        families.insert(
            "IE".to_string(),
            vec![language("GERMAN", &["kat", "hund"]), language("DUTCH", &["kat", "hont"])],
        );
        families.insert("Ura".to_string(), vec![language("FINNISH", &["kisa", "koira"])]);
        families.insert("Oth".to_string(), vec![language("MIXED", &["ka", "ko"])]);
        let glosses = [(1, "cat".to_string()), (2, "dog".to_string())].into_iter().collect();
        Corpus::new(families, glosses)
    }

    #[test]
    fn test_members_follow_family_order() {
        let corpus = corpus();
        let names: Vec<&str> = corpus.languages().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["GERMAN", "DUTCH", "MIXED", "FINNISH"]);
        let members = corpus.members();
        assert_eq!(members[3].0, "Ura");
        assert!(members.iter().all(|(_, l)| l.name != "LATIN"));
    }

    #[test]
    fn test_cull_rules() {
        let mut corpus = corpus();
        let family = corpus.families.get_mut("IE").unwrap();
        family.push(language("PROTO_GERMANIC", &["kat", "hund"]));
        family.push(language("OLD_NORSE", &["kat", "hund"]));
        family.push(language("SAXON_2", &["kat", "hund"]));
        family.push(language("FRISIAN", &["kaT", "hun#"]));
        family.push(Language::new("GAPPY", vec![vec!["XXX".to_string(); 10]]));

        let report = corpus.cull();
        let reasons: Vec<(&str, &CullReason)> =
            report.removed.iter().map(|c| (c.name.as_str(), &c.reason)).collect();
        assert!(reasons.contains(&("MIXED", &CullReason::UnclassifiedFamily)));
        assert!(reasons.contains(&("PROTO_GERMANIC", &CullReason::Historical)));
        assert!(reasons.contains(&("OLD_NORSE", &CullReason::Historical)));
        assert!(reasons.contains(&("SAXON_2", &CullReason::Historical)));
        assert!(reasons.contains(&("FRISIAN", &CullReason::IllegalSymbol('#'))));
        assert!(reasons.contains(&("GAPPY", &CullReason::TooManyMissing(10))));
        assert_eq!(report.removed_families, vec!["Oth".to_string()]);
        assert_eq!(corpus.language_count(), 3);
    }

    #[test]
    fn test_validate_detects_inventory_mismatch() {
        let mut corpus = corpus();
        assert!(corpus.validate().is_ok());
        corpus
            .families
            .get_mut("Ura")
            .unwrap()
            .push(language("ESTONIAN", &["kass"]));
        assert!(matches!(corpus.validate(), Err(LexError::SlotCountMismatch { .. })));
    }

    #[test]
    fn test_validate_detects_unknown_symbols() {
        let mut corpus = corpus();
        corpus.families.get_mut("Ura").unwrap()[0].word_list[0] = vec!["kis@".to_string()];
        assert!(matches!(corpus.validate(), Err(LexError::UnknownSymbol { symbol: '@', .. })));
    }

    #[test]
    fn test_split_keeps_families_together() {
        let corpus = corpus();
        let (training, test) = corpus.split(7);
        assert_eq!(training.language_count() + test.language_count(), corpus.language_count());
        assert!(training.language_count() <= corpus.language_count() / 2);
        for family in training.families.keys() {
            assert!(!test.families.contains_key(family));
        }
        assert_eq!(corpus.split(7), (training, test));
    }

    #[test]
    fn test_retain_drops_empty_families() {
        let mut corpus = corpus();
        let removed = corpus.retain(|family, _| family != "Ura");
        assert_eq!(removed, 1);
        assert!(!corpus.families.contains_key("Ura"));
    }

    #[test]
    fn test_stats() {
        let mut corpus = corpus();
        corpus.families.get_mut("Ura").unwrap()[0].word_list[1] = vec!["XXX".to_string()];
        let stats = corpus.stats();
        assert_eq!(stats.families, 3);
        assert_eq!(stats.languages, 4);
        assert_eq!(stats.concepts, 2);
        assert_eq!(stats.words, 7);
        assert_eq!(stats.missing_slots, 1);
    }

    #[test]
    fn test_serde_roundtrip_preserves_word_lists() {
        let corpus = corpus();
        let json = serde_json::to_string(&corpus).unwrap();
        let back: Corpus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, corpus);
    }
}
