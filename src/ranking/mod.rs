//! Ranking and score fusion
//!
//! A query is scored against every stored document along three signals:
//! cosine similarity per aspect embedding, lexical token overlap, and a
//! synonym-aware occurrence score. The search mode decides how the signals
//! combine into one relevance score.

mod ranker;
pub mod scoring;

pub use ranker::Ranker;

use crate::config::RankingConfig;
use crate::embedding::Aspect;
use serde::Serialize;
use std::collections::BTreeMap;

/// Signal combination applied to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Weighted fusion of vector, keyword, and semantic signals
    Hybrid,
    /// Full-text cosine similarity alone
    Vector,
    /// Query-token overlap alone
    Keyword,
}

impl SearchMode {
    /// Parse a textual mode label. Unrecognized labels fall back to
    /// vector-only scoring instead of failing the search.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "hybrid" => SearchMode::Hybrid,
            "vector" => SearchMode::Vector,
            "keyword" => SearchMode::Keyword,
            other => {
                tracing::warn!("Unknown search mode '{}', using vector scoring", other);
                SearchMode::Vector
            }
        }
    }
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Hybrid
    }
}

/// Per-signal scores for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    /// Cosine similarity per aspect present on the document
    pub vector: BTreeMap<Aspect, f32>,
    /// Fraction of query tokens found in the document
    pub keyword: f32,
    /// Synonym-aware occurrence score
    pub semantic: f32,
}

impl ScoreBreakdown {
    /// Cosine score for one aspect; aspects the document lacks score 0.
    pub fn vector_score(&self, aspect: Aspect) -> f32 {
        self.vector.get(&aspect).copied().unwrap_or(0.0)
    }

    /// Fuse the signals for `mode`.
    ///
    /// Hybrid applies the configured weights as given: a missing aspect
    /// contributes 0 and the remaining weights are never renormalized, so a
    /// document without a technical section competes for at most 0.8 of the
    /// default weight mass.
    pub fn fuse(&self, mode: SearchMode, weights: &RankingConfig) -> f32 {
        match mode {
            SearchMode::Hybrid => {
                weights.full_text_weight * self.vector_score(Aspect::FullText)
                    + weights.well_info_weight * self.vector_score(Aspect::WellInfo)
                    + weights.technical_weight * self.vector_score(Aspect::TechnicalData)
                    + weights.keyword_weight * self.keyword
                    + weights.semantic_weight * self.semantic
            }
            SearchMode::Vector => self.vector_score(Aspect::FullText),
            SearchMode::Keyword => self.keyword,
        }
    }
}

/// One search result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedDocument {
    pub document_id: u64,
    pub filename: String,
    /// Full document text
    pub content: String,
    /// Fused score for the requested mode
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

impl RankedDocument {
    /// Head of the content for display, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() <= max_chars {
            self.content.clone()
        } else {
            let cut: String = self.content.chars().take(max_chars).collect();
            format!("{}...", cut.trim_end())
        }
    }
}
