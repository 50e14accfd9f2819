//! Embedding generation
//!
//! This module provides the embedding provider abstraction, the line-level
//! section classifier, and the multi-aspect embedder that turns one document
//! into a set of labeled vectors.

mod aspects;
mod provider;
mod sections;

pub use aspects::{AspectEmbedder, FULL_TEXT_WINDOW, SECTION_WINDOW};
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
pub use sections::classify;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic slice of a document that receives its own embedding.
///
/// `FullText` covers the head of the whole document and is present on every
/// stored document. The remaining aspects exist only when the section
/// classifier routed at least one line to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    /// Head of the whole document
    FullText,
    /// Identification and header content, the default section
    WellInfo,
    /// Measurement-heavy content
    TechnicalData,
    /// Geological descriptions
    GeologicalData,
    /// Digit-dense content
    NumericalData,
}

impl Aspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::FullText => "full_text",
            Aspect::WellInfo => "well_info",
            Aspect::TechnicalData => "technical_data",
            Aspect::GeologicalData => "geological_data",
            Aspect::NumericalData => "numerical_data",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
