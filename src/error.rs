// error.rs - Error types for the core library

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the core and data layers.
///
/// Degenerate statistics (no on-diagonal entries, no accepted alignments,
/// empty words) are not errors; they resolve to documented fallback values
/// inside the components that produce them.
#[derive(Debug, Error)]
pub enum LexError {
    /// Two languages compared against each other have different concept inventories
    #[error("concept slot mismatch: '{left}' has {left_slots} slots, '{right}' has {right_slots}")]
    SlotCountMismatch {
        left: String,
        left_slots: usize,
        right: String,
        right_slots: usize,
    },

    /// A word contains a character outside the phonetic alphabet
    #[error("unknown symbol '{symbol}' in word '{word}' ({language})")]
    UnknownSymbol {
        symbol: char,
        word: String,
        language: String,
    },

    #[error("variant list must not be empty")]
    EmptyVariantList,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("corpus error: {0}")]
    Corpus(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decompress '{}': {message}", path.display())]
    Decompress { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, LexError>;

impl LexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LexError::Io {
            path: path.into(),
            source,
        }
    }
}
