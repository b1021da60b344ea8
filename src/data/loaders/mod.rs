// mod.rs - Corpus file loaders

pub mod asjp;
