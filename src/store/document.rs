//! Document data model

use crate::embedding::Aspect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata attached to an ingested document.
///
/// `filename` and `error` are the contract with the extraction pipeline;
/// whatever else the pipeline reports rides along in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source file name, used for display and logging
    pub filename: String,
    /// Upstream extraction failure flag; flagged documents are never stored
    #[serde(default)]
    pub error: bool,
    /// Pass-through fields from the extraction pipeline
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            error: false,
            extra: BTreeMap::new(),
        }
    }
}

/// An ingested document, immutable once appended to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned id, strictly increasing with insertion order
    pub id: u64,
    /// Full extracted text
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Embedding per aspect; `full_text` is always present
    pub aspects: BTreeMap<Aspect, Vec<f32>>,
    /// Informational only, never used for ranking
    pub ingested_at: DateTime<Utc>,
}
