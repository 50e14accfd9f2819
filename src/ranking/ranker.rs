//! Exhaustive scoring over the document store

use super::scoring::{cosine_similarity, keyword_overlap, semantic_score, tokenize};
use super::{RankedDocument, ScoreBreakdown, SearchMode};
use crate::config::RankingConfig;
use crate::embedding::{Aspect, EmbeddingError, EmbeddingProvider};
use crate::store::{Document, DocumentStore};
use ahash::AHashSet;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scores queries against a document store.
///
/// Every stored document is scored in full on each query. The store is
/// small enough that an exhaustive scan beats maintaining index structures,
/// and it keeps scores exact.
pub struct Ranker {
    provider: Arc<dyn EmbeddingProvider>,
    weights: RankingConfig,
}

impl Ranker {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, weights: RankingConfig) -> Self {
        Self { provider, weights }
    }

    /// Rank the store against `query` and return the top `limit` documents.
    ///
    /// The query is embedded once per call. Ties break toward the
    /// earlier-ingested document so result order is stable across runs.
    pub fn search(
        &self,
        store: &DocumentStore,
        query: &str,
        limit: usize,
        mode: SearchMode,
    ) -> Result<Vec<RankedDocument>, EmbeddingError> {
        let documents = store.documents();
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(query)?;
        let query_tokens = tokenize(query);

        let mut scored: Vec<(Arc<Document>, f32, ScoreBreakdown)> = documents
            .into_iter()
            .map(|doc| {
                let breakdown = self.score(&query_embedding, &query_tokens, &doc);
                let score = breakdown.fuse(mode, &self.weights);
                (doc, score, breakdown)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);

        // Result structs are built only for the surviving top of the list.
        let results = scored
            .into_iter()
            .map(|(doc, score, breakdown)| RankedDocument {
                document_id: doc.id,
                filename: doc.metadata.filename.clone(),
                content: doc.text.clone(),
                score,
                breakdown,
            })
            .collect();

        Ok(results)
    }

    fn score(
        &self,
        query_embedding: &[f32],
        query_tokens: &[String],
        doc: &Document,
    ) -> ScoreBreakdown {
        let haystack = doc.text.to_lowercase();
        let doc_tokens: AHashSet<&str> = haystack.split_whitespace().collect();

        let vector: BTreeMap<Aspect, f32> = doc
            .aspects
            .iter()
            .map(|(aspect, embedding)| (*aspect, cosine_similarity(query_embedding, embedding)))
            .collect();

        ScoreBreakdown {
            vector,
            keyword: keyword_overlap(query_tokens, &doc_tokens),
            semantic: semantic_score(query_tokens, &haystack, self.weights.synonym_credit),
        }
    }
}
