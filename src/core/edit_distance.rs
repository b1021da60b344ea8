// edit_distance.rs - Normalized Levenshtein distance between words

use std::str::FromStr;

use crate::error::{LexError, Result};

/// How variant lists are reduced to a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantMode {
    /// Closest variant pair
    Best,
    /// Arithmetic mean over all variant pairs
    Average,
}

impl FromStr for VariantMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" | "min" => Ok(VariantMode::Best),
            "average" | "mean" => Ok(VariantMode::Average),
            _ => Err(format!("Invalid variant mode: {}. Use: best, average", s)),
        }
    }
}

/// Levenshtein distance over characters (two-row dynamic programming)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Levenshtein distance divided by the longer word's length, in [0, 1].
/// Two empty words are at distance 0.
pub fn normalized_distance(word1: &str, word2: &str) -> f64 {
    let max_len = word1.chars().count().max(word2.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    levenshtein(word1, word2) as f64 / max_len as f64
}

/// Reduce the distances of every variant combination to one value
pub fn list_distance<S1, S2>(words1: &[S1], words2: &[S2], mode: VariantMode) -> Result<f64>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    if words1.is_empty() || words2.is_empty() {
        return Err(LexError::EmptyVariantList);
    }

    let distances = words1.iter().flat_map(|w1| {
        words2
            .iter()
            .map(move |w2| normalized_distance(w1.as_ref(), w2.as_ref()))
    });

    Ok(reduce(distances, mode, f64::min))
}

/// Fold values by `mode`; `pick` chooses the better of two values in `Best` mode
pub(crate) fn reduce<I>(values: I, mode: VariantMode, pick: fn(f64, f64) -> f64) -> f64
where
    I: Iterator<Item = f64>,
{
    match mode {
        VariantMode::Best => values.reduce(pick).unwrap_or(f64::NAN),
        VariantMode::Average => {
            let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        }
    }
}
