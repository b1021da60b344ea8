// alignment.rs - Global pairwise alignment of short words

use serde::{Deserialize, Serialize};

use crate::core::alphabet::GAP;
use crate::core::substitution::SubstitutionMatrix;

/// Score reported when no alignment could be scored
pub const NO_ALIGNMENT_SCORE: f64 = -200.0;

/// Gap scores for substitution-driven alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    pub gap_open: f64,
    pub gap_extend: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            gap_open: -2.4166728,
            gap_extend: -1.51569227,
        }
    }
}

impl AlignmentConfig {
    pub fn custom(gap_open: f64, gap_extend: f64) -> Self {
        Self { gap_open, gap_extend }
    }
}

/// How column and gap scores are assigned
#[derive(Debug, Clone, Copy)]
pub enum ScoringPolicy<'a> {
    /// Every column and gap scores 0
    Unit,
    /// Match +1, mismatch 0, free gaps
    Identity,
    /// Match 0, mismatch -1, gap open -1, gap extend -1
    Edit,
    /// Column scores looked up in a substitution matrix; unknown pairs score 0
    Substitution {
        matrix: &'a SubstitutionMatrix,
        gap_open: f64,
        gap_extend: f64,
    },
}

impl<'a> ScoringPolicy<'a> {
    pub fn substitution(matrix: &'a SubstitutionMatrix, config: &AlignmentConfig) -> Self {
        ScoringPolicy::Substitution {
            matrix,
            gap_open: config.gap_open,
            gap_extend: config.gap_extend,
        }
    }

    fn column_score(&self, a: char, b: char) -> f64 {
        match self {
            ScoringPolicy::Unit => 0.0,
            ScoringPolicy::Identity => {
                if a == b {
                    1.0
                } else {
                    0.0
                }
            }
            ScoringPolicy::Edit => {
                if a == b {
                    0.0
                } else {
                    -1.0
                }
            }
            ScoringPolicy::Substitution { matrix, .. } => matrix.score(a, b),
        }
    }

    fn gap_scores(&self) -> (f64, f64) {
        match self {
            ScoringPolicy::Unit | ScoringPolicy::Identity => (0.0, 0.0),
            ScoringPolicy::Edit => (-1.0, -1.0),
            ScoringPolicy::Substitution {
                gap_open,
                gap_extend,
                ..
            } => (*gap_open, *gap_extend),
        }
    }
}

/// Two gapped sequences of equal length plus the score that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub aligned1: String,
    pub aligned2: String,
    pub score: f64,
}

impl Alignment {
    /// Aligned columns as symbol pairs, gaps included
    pub fn columns(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.aligned1.chars().zip(self.aligned2.chars())
    }

    pub fn len(&self) -> usize {
        self.aligned1.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned1.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Column pairs a symbol from each word
    Pair,
    /// Symbol from the first word against a gap
    GapInSecond,
    /// Gap against a symbol from the second word
    GapInFirst,
}

/// Three-layer score table (Gotoh) over (len1+1) x (len2+1) cells
struct ScoreTable {
    cols: usize,
    pair: Vec<f64>,
    gap_in_second: Vec<f64>,
    gap_in_first: Vec<f64>,
}

impl ScoreTable {
    fn new(rows: usize, cols: usize) -> Self {
        let size = rows * cols;
        Self {
            cols,
            pair: vec![f64::NEG_INFINITY; size],
            gap_in_second: vec![f64::NEG_INFINITY; size],
            gap_in_first: vec![f64::NEG_INFINITY; size],
        }
    }

    fn at(&self, state: State, i: usize, j: usize) -> f64 {
        let idx = i * self.cols + j;
        match state {
            State::Pair => self.pair[idx],
            State::GapInSecond => self.gap_in_second[idx],
            State::GapInFirst => self.gap_in_first[idx],
        }
    }
}

/// First candidate holding the maximum; candidates are listed in tie-break order
fn best_of(candidates: [(State, f64); 3]) -> (State, f64) {
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best
}

/// Best global alignment of `word1` and `word2` under `policy`.
///
/// Gaps are affine: a run of n gap columns scores `open + (n-1) * extend`, and
/// end gaps are scored like interior ones. Among equally good tracebacks the
/// diagonal move is preferred, then a gap in the second word, then a gap in the
/// first word. An empty word aligns against an all-gap side.
pub fn align(word1: &str, word2: &str, policy: &ScoringPolicy) -> Alignment {
    let a: Vec<char> = word1.chars().collect();
    let b: Vec<char> = word2.chars().collect();
    let (n, m) = (a.len(), b.len());
    let (open, extend) = policy.gap_scores();

    let mut table = ScoreTable::new(n + 1, m + 1);
    table.pair[0] = 0.0;

    for i in 0..=n {
        for j in 0..=m {
            if i == 0 && j == 0 {
                continue;
            }
            let idx = i * table.cols + j;
            if i > 0 && j > 0 {
                let (_, prev) = best_of([
                    (State::Pair, table.at(State::Pair, i - 1, j - 1)),
                    (State::GapInSecond, table.at(State::GapInSecond, i - 1, j - 1)),
                    (State::GapInFirst, table.at(State::GapInFirst, i - 1, j - 1)),
                ]);
                table.pair[idx] = prev + policy.column_score(a[i - 1], b[j - 1]);
            }
            if i > 0 {
                let (_, prev) = best_of([
                    (State::Pair, table.at(State::Pair, i - 1, j) + open),
                    (State::GapInSecond, table.at(State::GapInSecond, i - 1, j) + extend),
                    (State::GapInFirst, table.at(State::GapInFirst, i - 1, j) + open),
                ]);
                table.gap_in_second[idx] = prev;
            }
            if j > 0 {
                let (_, prev) = best_of([
                    (State::Pair, table.at(State::Pair, i, j - 1) + open),
                    (State::GapInSecond, table.at(State::GapInSecond, i, j - 1) + open),
                    (State::GapInFirst, table.at(State::GapInFirst, i, j - 1) + extend),
                ]);
                table.gap_in_first[idx] = prev;
            }
        }
    }

    let (mut state, score) = best_of([
        (State::Pair, table.at(State::Pair, n, m)),
        (State::GapInSecond, table.at(State::GapInSecond, n, m)),
        (State::GapInFirst, table.at(State::GapInFirst, n, m)),
    ]);

    // Traceback
    let mut aligned1 = Vec::with_capacity(n + m);
    let mut aligned2 = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match state {
            State::Pair => {
                aligned1.push(a[i - 1]);
                aligned2.push(b[j - 1]);
                i -= 1;
                j -= 1;
                if i == 0 && j == 0 {
                    break;
                }
                state = best_of([
                    (State::Pair, table.at(State::Pair, i, j)),
                    (State::GapInSecond, table.at(State::GapInSecond, i, j)),
                    (State::GapInFirst, table.at(State::GapInFirst, i, j)),
                ])
                .0;
            }
            State::GapInSecond => {
                aligned1.push(a[i - 1]);
                aligned2.push(GAP);
                i -= 1;
                if i == 0 && j == 0 {
                    break;
                }
                state = best_of([
                    (State::Pair, table.at(State::Pair, i, j) + open),
                    (State::GapInSecond, table.at(State::GapInSecond, i, j) + extend),
                    (State::GapInFirst, table.at(State::GapInFirst, i, j) + open),
                ])
                .0;
            }
            State::GapInFirst => {
                aligned1.push(GAP);
                aligned2.push(b[j - 1]);
                j -= 1;
                if i == 0 && j == 0 {
                    break;
                }
                state = best_of([
                    (State::Pair, table.at(State::Pair, i, j) + open),
                    (State::GapInSecond, table.at(State::GapInSecond, i, j) + open),
                    (State::GapInFirst, table.at(State::GapInFirst, i, j) + extend),
                ])
                .0;
            }
        }
    }
    aligned1.reverse();
    aligned2.reverse();

    Alignment {
        aligned1: aligned1.into_iter().collect(),
        aligned2: aligned2.into_iter().collect(),
        score,
    }
}

/// Substitution-driven alignment score of two words.
///
/// A score that is not finite (e.g. a matrix holding infinities) is reported as
/// [`NO_ALIGNMENT_SCORE`] paired with the unaligned words, so batch callers keep going.
pub fn pmi_alignment(
    word1: &str,
    word2: &str,
    matrix: &SubstitutionMatrix,
    config: &AlignmentConfig,
) -> Alignment {
    let gaps_usable = config.gap_open.is_finite() && config.gap_extend.is_finite();
    let alignment = if gaps_usable {
        align(word1, word2, &ScoringPolicy::substitution(matrix, config))
    } else {
        Alignment {
            aligned1: String::new(),
            aligned2: String::new(),
            score: f64::NAN,
        }
    };
    if alignment.score.is_finite() {
        alignment
    } else {
        Alignment {
            aligned1: word1.to_string(),
            aligned2: word2.to_string(),
            score: NO_ALIGNMENT_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(alignment: &Alignment, word1: &str, word2: &str) {
        assert_eq!(alignment.aligned1.chars().count(), alignment.aligned2.chars().count());
        assert!(alignment.columns().all(|(x, y)| !(x == GAP && y == GAP)));
        let strip = |s: &str| s.chars().filter(|c| *c != GAP).collect::<String>();
        assert_eq!(strip(&alignment.aligned1), word1);
        assert_eq!(strip(&alignment.aligned2), word2);
    }

    #[test]
    fn test_edit_policy_prefers_similar_words() {
        let far = align("kat", "hund", &ScoringPolicy::Edit);
        let near = align("kat", "kot", &ScoringPolicy::Edit);
        assert!(near.score > far.score);
        assert_eq!(near.score, -1.0);
        assert_eq!(far.score, -4.0);
        assert_eq!(near.aligned1, "kat");
        assert_eq!(near.aligned2, "kot");
    }

    #[test]
    fn test_edit_policy_with_insertion() {
        let alignment = align("hund", "hnd", &ScoringPolicy::Edit);
        assert_eq!(alignment.score, -1.0);
        assert_eq!(alignment.aligned1, "hund");
        assert_eq!(alignment.aligned2, "h-nd");
    }

    #[test]
    fn test_identical_words() {
        let alignment = align("mano", "mano", &ScoringPolicy::Identity);
        assert_eq!(alignment.score, 4.0);
        assert_eq!(alignment.aligned1, "mano");
        assert_eq!(alignment.aligned2, "mano");
    }

    #[test]
    fn test_empty_words_do_not_panic() {
        let alignment = align("", "abc", &ScoringPolicy::Edit);
        assert_eq!(alignment.aligned1, "---");
        assert_eq!(alignment.aligned2, "abc");
        assert_eq!(alignment.score, -3.0);

        let alignment = align("ab", "", &ScoringPolicy::Edit);
        assert_eq!(alignment.aligned1, "ab");
        assert_eq!(alignment.aligned2, "--");

        let alignment = align("", "", &ScoringPolicy::Edit);
        assert!(alignment.is_empty());
        assert_eq!(alignment.score, 0.0);
    }

    #[test]
    fn test_unit_policy_is_deterministic() {
        let first = align("pater", "fadr", &ScoringPolicy::Unit);
        let second = align("pater", "fadr", &ScoringPolicy::Unit);
        assert_eq!(first, second);
        assert_eq!(first.score, 0.0);
        assert_well_formed(&first, "pater", "fadr");
        // diagonal moves win ties
        assert_eq!(first.aligned1, "pater");
        assert_eq!(first.aligned2, "-fadr");
    }

    #[test]
    fn test_affine_gaps_group_into_one_run() {
        let mut matrix = SubstitutionMatrix::new();
        for c in ['a', 'b', 'c', 'd'] {
            matrix.set(c, c, 3.0);
        }
        let config = AlignmentConfig::custom(-4.0, -0.5);
        let alignment = align("abcd", "ad", &ScoringPolicy::substitution(&matrix, &config));
        assert_well_formed(&alignment, "abcd", "ad");
        assert_eq!(alignment.aligned2, "a--d");
        assert!((alignment.score - (3.0 + 3.0 - 4.0 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_substitution_policy_uses_matrix() {
        let mut matrix = SubstitutionMatrix::new();
        matrix.set('t', 'd', 2.0);
        matrix.set('a', 'a', 1.0);
        let config = AlignmentConfig::custom(-2.0, -1.0);
        let alignment = pmi_alignment("ta", "da", &matrix, &config);
        assert_eq!(alignment.score, 3.0);
        assert_eq!(alignment.aligned1, "ta");
        assert_eq!(alignment.aligned2, "da");
    }

    #[test]
    fn test_non_finite_scores_fall_back_to_sentinel() {
        let mut matrix = SubstitutionMatrix::new();
        matrix.set('a', 'b', f64::NAN);
        let config = AlignmentConfig::custom(-1.0, -1.0);
        let alignment = pmi_alignment("a", "b", &matrix, &config);
        assert_eq!(alignment.score, NO_ALIGNMENT_SCORE);
        assert_eq!(alignment.aligned1, "a");
        assert_eq!(alignment.aligned2, "b");
    }

    #[test]
    fn test_alignments_are_well_formed() {
        let pairs = [("pater", "fater"), ("!kaa", "ka"), ("xoxo", "oxox"), ("a", "bbbb")];
        for (w1, w2) in pairs {
            for policy in [ScoringPolicy::Unit, ScoringPolicy::Identity, ScoringPolicy::Edit] {
                assert_well_formed(&align(w1, w2, &policy), w1, w2);
            }
        }
    }
}
