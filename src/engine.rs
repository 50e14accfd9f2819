//! Knowledge base facade
//!
//! Wires the embedding provider, document store, ranker, and snapshot file
//! into a single handle the CLI drives.

use crate::config::Config;
use crate::embedding::{AspectEmbedder, EmbeddingProvider};
use crate::error::Result;
use crate::ranking::{RankedDocument, Ranker, SearchMode};
use crate::store::{snapshot, DocumentMetadata, DocumentStore, SnapshotError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// One ingestion input: extracted text plus upstream metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRecord {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Outcome counts for one ingestion batch.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    /// Documents embedded and appended
    pub added: usize,
    /// Documents skipped by the rejection rules
    pub rejected: usize,
    /// Documents whose embedding failed
    pub failed: usize,
    pub duration_ms: u64,
}

pub struct KnowledgeBase {
    store: DocumentStore,
    ranker: Ranker,
    snapshot_path: PathBuf,
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("snapshot_path", &self.snapshot_path)
            .field("documents", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl KnowledgeBase {
    /// Open the knowledge base described by `config`, rehydrating from the
    /// snapshot when one exists.
    ///
    /// A snapshot written at a different embedding dimension is refused; a
    /// snapshot written by a different model at the same dimension loads
    /// with a warning since its scores are merely stale, not unusable.
    pub fn open(config: &Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let snapshot_path = config.snapshot_path()?;
        let embedder = AspectEmbedder::new(provider.clone());

        let store = match snapshot::read(&snapshot_path)? {
            Some(snapshot) => {
                if snapshot.dimension != provider.dimension() {
                    return Err(SnapshotError::DimensionMismatch {
                        expected: provider.dimension(),
                        actual: snapshot.dimension,
                    }
                    .into());
                }
                if snapshot.model != provider.model_name() {
                    tracing::warn!(
                        "Snapshot was built with model '{}' but '{}' is active; scores will drift until documents are re-ingested",
                        snapshot.model,
                        provider.model_name()
                    );
                }
                tracing::info!(
                    "Loaded {} documents from {}",
                    snapshot.documents.len(),
                    snapshot_path.display()
                );
                DocumentStore::from_documents(embedder, snapshot.documents)
            }
            None => {
                tracing::info!(
                    "No snapshot at {}, starting empty",
                    snapshot_path.display()
                );
                DocumentStore::new(embedder)
            }
        };

        let ranker = Ranker::new(provider, config.ranking.clone());

        Ok(Self {
            store,
            ranker,
            snapshot_path,
        })
    }

    /// Ingest a batch of records.
    ///
    /// A record that is rejected or fails to embed never aborts the rest of
    /// the batch. The snapshot is written once at the end, and only when
    /// something was actually added.
    pub fn ingest<I>(&self, records: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = IngestRecord>,
    {
        let start = Instant::now();
        let mut report = IngestReport::default();

        for record in records {
            let filename = record.metadata.filename.clone();
            match self.store.add(&record.text, record.metadata) {
                Ok(true) => report.added += 1,
                Ok(false) => report.rejected += 1,
                Err(e) => {
                    tracing::warn!("Failed to embed {}: {}", filename, e);
                    report.failed += 1;
                }
            }
        }

        if report.added > 0 {
            self.save()?;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Ingested batch: {} added, {} rejected, {} failed in {}ms",
            report.added,
            report.rejected,
            report.failed,
            report.duration_ms
        );
        Ok(report)
    }

    /// Rank stored documents against `query`.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        mode: SearchMode,
    ) -> Result<Vec<RankedDocument>> {
        Ok(self.ranker.search(&self.store, query, limit, mode)?)
    }

    /// Write the snapshot to disk.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.snapshot_path)?;
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// False until at least one document is stored.
    pub fn is_ready(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn model_name(&self) -> &str {
        self.store.model_name()
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}
