// mod.rs - Data structures module

pub mod language;
pub mod loaders;
pub mod persistence;

// Re-export main types for convenience
pub use language::{Corpus, CorpusStats, CullReason, CullReport, CulledLanguage, Language};
pub use persistence::{load, save, MatrixFile, MatrixMetadata};
