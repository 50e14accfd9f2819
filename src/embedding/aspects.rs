//! Multi-aspect embedding generation

use super::{classify, Aspect, EmbeddingError, EmbeddingProvider};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Character window for the whole-document aspect.
pub const FULL_TEXT_WINDOW: usize = 1000;

/// Character window for each section aspect.
pub const SECTION_WINDOW: usize = 500;

/// Turns one document into a set of labeled embeddings.
///
/// The full-text aspect embeds the head of the document; each section aspect
/// embeds the head of whatever text the classifier routed to it. The windows
/// bound embedding cost to a small constant per document regardless of
/// document size. All inputs go to the provider as a single batch.
pub struct AspectEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl AspectEmbedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Embedding dimension of the underlying provider
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Model name of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Embed a document into its aspect map. `full_text` is always present;
    /// section aspects appear only when the classifier produced them.
    pub fn embed_document(
        &self,
        text: &str,
    ) -> Result<BTreeMap<Aspect, Vec<f32>>, EmbeddingError> {
        let sections = classify(text);

        let mut labels = Vec::with_capacity(sections.len() + 1);
        let mut inputs = Vec::with_capacity(sections.len() + 1);

        labels.push(Aspect::FullText);
        inputs.push(truncate_chars(text, FULL_TEXT_WINDOW).to_string());

        for (aspect, section_text) in &sections {
            labels.push(*aspect);
            inputs.push(truncate_chars(section_text, SECTION_WINDOW).to_string());
        }

        let vectors = self.provider.embed_batch(&inputs)?;
        if vectors.len() != labels.len() {
            return Err(EmbeddingError::Unavailable(format!(
                "expected {} embeddings, got {}",
                labels.len(),
                vectors.len()
            )));
        }

        Ok(labels.into_iter().zip(vectors).collect())
    }
}

/// First `max` characters of `s`, never splitting a UTF-8 scalar.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
