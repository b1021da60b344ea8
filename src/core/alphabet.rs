// alphabet.rs - Closed phonetic symbol inventory

use crate::error::{LexError, Result};

/// Marker for a concept with no attested word
pub const MISSING_WORD: &str = "XXX";

/// Gap symbol emitted by the aligner
pub const GAP: char = '-';

/// The phonetic symbols a word may be written with.
pub const PHONETIC_SYMBOLS: [char; 41] = [
    'p', 'b', 'f', 'v', 'm', 'w', '8', '4', 't', 'd', 's', 'z', 'c', 'n', 'r', 'l', 'S', 'Z', 'C',
    'j', 'T', '5', 'y', 'k', 'g', 'x', 'N', 'q', 'G', 'X', 'h', '7', 'L', '!', 'i', 'e', 'E', '3',
    'a', 'u', 'o',
];

pub fn is_phonetic_symbol(c: char) -> bool {
    PHONETIC_SYMBOLS.contains(&c)
}

pub fn is_missing(word: &str) -> bool {
    word == MISSING_WORD
}

/// A slot carries no usable word when it is empty or holds only the missing marker
pub fn is_missing_slot(slot: &[String]) -> bool {
    slot.iter().all(|w| is_missing(w))
}

/// Attested variants of a slot, with missing markers dropped
pub fn attested(slot: &[String]) -> Vec<&str> {
    slot.iter()
        .map(String::as_str)
        .filter(|w| !is_missing(w))
        .collect()
}

/// Check that every character of `word` belongs to the alphabet.
/// The missing marker is accepted as a whole word.
pub fn validate_word(word: &str, language: &str) -> Result<()> {
    if is_missing(word) {
        return Ok(());
    }
    match word.chars().find(|c| !is_phonetic_symbol(*c)) {
        Some(symbol) => Err(LexError::UnknownSymbol {
            symbol,
            word: word.to_string(),
            language: language.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let mut symbols = PHONETIC_SYMBOLS.to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), PHONETIC_SYMBOLS.len());
        assert!(!is_phonetic_symbol(GAP));
    }

    #[test]
    fn test_validate_word() {
        assert!(validate_word("hund", "GERMAN").is_ok());
        assert!(validate_word("!kaa", "KHOE").is_ok());
        assert!(validate_word(MISSING_WORD, "GERMAN").is_ok());

        match validate_word("haus#", "GERMAN") {
            Err(LexError::UnknownSymbol { symbol, .. }) => assert_eq!(symbol, '#'),
            other => panic!("expected unknown symbol error, got {:?}", other),
        }
        // Uppercase letters outside the inventory are rejected
        assert!(validate_word("Apa", "X").is_err());
    }

    #[test]
    fn test_missing_slots() {
        let missing = vec![MISSING_WORD.to_string()];
        let mixed = vec![MISSING_WORD.to_string(), "kat".to_string()];
        assert!(is_missing_slot(&missing));
        assert!(is_missing_slot(&[]));
        assert!(!is_missing_slot(&mixed));
        assert_eq!(attested(&mixed), vec!["kat"]);
    }
}
