//! Append-only document store
//!
//! Documents are held in memory behind a single `RwLock`: appends take the
//! write lock, searches take short read locks, and snapshot writes hold the
//! read guard for their whole duration so an append can never interleave
//! with a save. Embedding happens before the lock is touched.

pub mod document;
pub mod snapshot;

pub use document::{Document, DocumentMetadata};
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};

use crate::embedding::{AspectEmbedder, EmbeddingError};
use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Documents whose trimmed text is at or below this length carry too little
/// signal to index and are rejected.
pub const MIN_TEXT_CHARS: usize = 50;

struct StoreInner {
    documents: Vec<Arc<Document>>,
    next_id: u64,
}

pub struct DocumentStore {
    embedder: AspectEmbedder,
    inner: RwLock<StoreInner>,
}

impl DocumentStore {
    pub fn new(embedder: AspectEmbedder) -> Self {
        Self {
            embedder,
            inner: RwLock::new(StoreInner {
                documents: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Rehydrate a store from snapshot documents. Ids resume after the
    /// highest id seen so rehydrated and fresh documents never collide.
    pub fn from_documents(embedder: AspectEmbedder, documents: Vec<Document>) -> Self {
        let next_id = documents.iter().map(|d| d.id).max().map_or(1, |max| max + 1);
        let documents = documents.into_iter().map(Arc::new).collect();
        Self {
            embedder,
            inner: RwLock::new(StoreInner { documents, next_id }),
        }
    }

    /// Append a document unless it is rejected.
    ///
    /// Returns `Ok(false)` without touching the store when the upstream
    /// extraction error flag is set or the trimmed text is no longer than
    /// [`MIN_TEXT_CHARS`]. Embedding failures leave the store unchanged.
    pub fn add(&self, text: &str, metadata: DocumentMetadata) -> Result<bool, EmbeddingError> {
        if metadata.error {
            tracing::debug!(
                "Skipping {}: flagged as extraction error",
                metadata.filename
            );
            return Ok(false);
        }
        if text.trim().chars().count() <= MIN_TEXT_CHARS {
            tracing::debug!(
                "Skipping {}: below the {} character threshold",
                metadata.filename,
                MIN_TEXT_CHARS
            );
            return Ok(false);
        }

        // The provider round trip happens before the lock; only the append
        // itself holds it.
        let aspects = self.embedder.embed_document(text)?;

        let mut inner = self.inner.write().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.documents.push(Arc::new(Document {
            id,
            text: text.to_string(),
            metadata,
            aspects,
            ingested_at: Utc::now(),
        }));

        tracing::debug!("Stored document {}", id);
        Ok(true)
    }

    /// Insertion-order view of the stored documents. The clone is `Arc`s
    /// only, so searches scan without holding the lock.
    pub fn documents(&self) -> Vec<Arc<Document>> {
        self.inner.read().unwrap().documents.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Write the snapshot while holding the read guard: concurrent searches
    /// proceed, appends wait until the file is on disk.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let inner = self.inner.read().unwrap();
        snapshot::write(
            path,
            &inner.documents,
            self.embedder.model_name(),
            self.embedder.dimension(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingProvider;

    struct StubProvider {
        dimension: usize,
        fail: bool,
    }

    impl EmbeddingProvider for StubProvider {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if self.fail {
                return Err(EmbeddingError::Unavailable("stub offline".to_string()));
            }
            Ok(vec![1.0; self.dimension])
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            texts.iter().map(|t| self.embed(t)).collect()
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn store(fail: bool) -> DocumentStore {
        let provider = Arc::new(StubProvider { dimension: 4, fail });
        DocumentStore::new(AspectEmbedder::new(provider))
    }

    fn long_text(prefix: &str) -> String {
        format!("{prefix} with enough trailing context to clear the minimum size threshold")
    }

    #[test]
    fn test_add_assigns_ids_from_one() {
        let store = store(false);

        assert!(store.add(&long_text("first"), DocumentMetadata::new("a.pdf")).unwrap());
        assert!(store.add(&long_text("second"), DocumentMetadata::new("b.pdf")).unwrap());

        let docs = store.documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, 1);
        assert_eq!(docs[1].id, 2);
    }

    #[test]
    fn test_add_rejects_error_flagged_metadata() {
        let store = store(false);
        let mut metadata = DocumentMetadata::new("broken.pdf");
        metadata.error = true;

        assert!(!store.add(&long_text("text"), metadata).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_short_text_at_boundary() {
        let store = store(false);

        // Exactly 50 trimmed chars is rejected, 51 is accepted.
        let fifty = "x".repeat(50);
        let fifty_one = "x".repeat(51);

        assert!(!store.add(&fifty, DocumentMetadata::new("short.txt")).unwrap());
        assert!(store.add(&fifty_one, DocumentMetadata::new("long.txt")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_trims_before_measuring_length() {
        let store = store(false);

        // 50 meaningful chars padded with whitespace still fails.
        let padded = format!("   {}   \n\n", "x".repeat(50));
        assert!(!store.add(&padded, DocumentMetadata::new("padded.txt")).unwrap());
    }

    #[test]
    fn test_length_threshold_counts_chars_not_bytes() {
        let store = store(false);

        // 51 two-byte scalars: 102 bytes but 51 chars, so accepted.
        let text = "é".repeat(51);
        assert!(store.add(&text, DocumentMetadata::new("utf8.txt")).unwrap());
    }

    #[test]
    fn test_failed_embedding_leaves_store_unchanged() {
        let store = store(true);

        let result = store.add(&long_text("text"), DocumentMetadata::new("a.pdf"));
        assert!(matches!(result, Err(EmbeddingError::Unavailable(_))));
        assert!(store.is_empty());

        // Rejections are still decided before the provider is consulted.
        let mut flagged = DocumentMetadata::new("broken.pdf");
        flagged.error = true;
        assert!(!store.add(&long_text("text"), flagged).unwrap());
    }

    #[test]
    fn test_from_documents_resumes_id_sequence() {
        let provider = Arc::new(StubProvider {
            dimension: 4,
            fail: false,
        });
        let embedder = AspectEmbedder::new(provider.clone());

        let seed = DocumentStore::new(AspectEmbedder::new(provider));
        seed.add(&long_text("one"), DocumentMetadata::new("a.pdf")).unwrap();
        seed.add(&long_text("two"), DocumentMetadata::new("b.pdf")).unwrap();
        let persisted: Vec<Document> = seed
            .documents()
            .iter()
            .map(|d| Document::clone(d))
            .collect();

        let store = DocumentStore::from_documents(embedder, persisted);
        store.add(&long_text("three"), DocumentMetadata::new("c.pdf")).unwrap();

        let docs = store.documents();
        assert_eq!(docs.last().unwrap().id, 3);
    }
}
