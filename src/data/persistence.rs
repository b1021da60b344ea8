// persistence.rs - JSON datasets, optionally LZ4-compressed

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::estimator::EstimatorConfig;
use crate::core::substitution::SubstitutionMatrix;
use crate::error::{LexError, Result};

/// Paths ending in `.lz4` hold size-prepended LZ4 blocks of JSON
pub fn is_compressed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lz4"))
}

/// Serialize `value` as JSON to `path`, compressing when the extension asks for it
pub fn save<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    let bytes = if is_compressed(path) {
        lz4_flex::compress_prepend_size(&json)
    } else {
        json
    };
    std::fs::write(path, &bytes).map_err(|e| LexError::io(path, e))
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| LexError::io(path, e))?;
    let json = if is_compressed(path) {
        lz4_flex::decompress_size_prepended(&bytes).map_err(|e| LexError::Decompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        bytes
    };
    Ok(serde_json::from_slice(&json)?)
}

/// Provenance stored alongside a persisted matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixMetadata {
    pub version: String,
    pub created: String,
    pub gap_open: f64,
    pub gap_extend: f64,
    pub theta: f64,
    pub iterations: usize,
    pub candidate_policy: String,
    pub total_entries: usize,
    pub user_note: Option<String>,
    pub format_version: u32,
}

/// A substitution matrix on disk: "a:b" keyed entries plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixFile {
    pub entries: BTreeMap<String, f64>,
    pub metadata: MatrixMetadata,
}

impl MatrixFile {
    pub fn new(matrix: &SubstitutionMatrix, config: &EstimatorConfig, user_note: Option<String>) -> Self {
        let entries = matrix.to_keyed();
        let metadata = MatrixMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            gap_open: config.alignment.gap_open,
            gap_extend: config.alignment.gap_extend,
            theta: config.theta,
            iterations: config.iterations,
            candidate_policy: config.policy.to_string(),
            total_entries: entries.len(),
            user_note,
            format_version: 1,
        };
        Self { entries, metadata }
    }

    pub fn matrix(&self) -> Result<SubstitutionMatrix> {
        SubstitutionMatrix::from_keyed(&self.entries)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save(self, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        load(path)
    }
}
