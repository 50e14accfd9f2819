//! Knowledge base integration: ingestion rules and search modes
//!
//! Runs the full ingest and search flow against a deterministic stub
//! provider so no model download is needed.

use ahash::RandomState;
use geosift::config::Config;
use geosift::embedding::{EmbeddingError, EmbeddingProvider};
use geosift::engine::{IngestRecord, KnowledgeBase};
use geosift::ranking::SearchMode;
use geosift::store::DocumentMetadata;
use std::sync::Arc;
use tempfile::TempDir;

/// Deterministic stand-in for the embedding model: each token bumps one
/// bucket of the vector, so texts sharing vocabulary line up in vector space.
struct StubProvider {
    dimension: usize,
    hasher: RandomState,
}

impl StubProvider {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            hasher: RandomState::with_seeds(3, 17, 31, 97),
        }
    }
}

impl EmbeddingProvider for StubProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.contains("#fail#") {
            return Err(EmbeddingError::Unavailable("stub offline".to_string()));
        }
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let bucket = self.hasher.hash_one(token.to_lowercase()) as usize % self.dimension;
            vector[bucket] += 1.0;
        }
        Ok(vector)
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

fn test_config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = temp.path().to_path_buf();
    config
}

fn open(temp: &TempDir) -> KnowledgeBase {
    let provider = Arc::new(StubProvider::new(64));
    KnowledgeBase::open(&test_config(temp), provider).unwrap()
}

fn record(filename: &str, text: &str) -> IngestRecord {
    IngestRecord {
        text: text.to_string(),
        metadata: DocumentMetadata::new(filename),
    }
}

#[test]
fn test_mixed_batch_reports_counts() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    let mut flagged = record("broken.pdf", "extraction produced nothing usable from this scan");
    flagged.metadata.error = true;

    let report = kb
        .ingest(vec![
            record(
                "log_a.pdf",
                "Well name: Smith #1\nFormation: sandstone with interbedded shale\nDepth: 3010 ft",
            ),
            record("tiny.txt", "too short to index"),
            flagged,
            record(
                "log_b.pdf",
                "Well name: Jones #2\nOperator: Acme Energy\nCounty: Reeves, Texas",
            ),
        ])
        .unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.rejected, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(kb.document_count(), 2);
    assert!(kb.is_ready());
    assert!(kb.snapshot_path().exists());
}

#[test]
fn test_embedding_failure_does_not_abort_batch() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    let report = kb
        .ingest(vec![
            record(
                "good_1.pdf",
                "Drilling report for the Smith lease covering the first quarter",
            ),
            record(
                "bad.pdf",
                "this document trips the provider #fail# and cannot be embedded",
            ),
            record(
                "good_2.pdf",
                "Completion summary for the Jones lease with casing details",
            ),
        ])
        .unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(kb.document_count(), 2);
}

#[test]
fn test_rejected_documents_do_not_consume_ids() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![
        record("skipped.txt", "too short"),
        record(
            "kept.pdf",
            "Sidetrack proposal for the Smith #1 well targeting the lower bench",
        ),
    ])
    .unwrap();

    let results = kb
        .search("sidetrack proposal", 5, SearchMode::Keyword)
        .unwrap();
    assert_eq!(results[0].document_id, 1);
}

#[test]
fn test_hybrid_search_ranks_matching_document_first() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![
        record(
            "core_analysis.pdf",
            "Core analysis shows sandstone porosity averaging twelve percent across the interval",
        ),
        record(
            "invoice.pdf",
            "Invoice for cementing services rendered during the month of March",
        ),
    ])
    .unwrap();

    let results = kb
        .search("sandstone porosity", 5, SearchMode::Hybrid)
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].filename, "core_analysis.pdf");
    assert!(results[0].score > results[1].score);
}

#[test]
fn test_keyword_mode_scores_full_containment_as_one() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![record(
        "core_analysis.pdf",
        "Core analysis shows sandstone porosity averaging twelve percent across the interval",
    )])
    .unwrap();

    let results = kb
        .search("sandstone porosity", 5, SearchMode::Keyword)
        .unwrap();
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn test_search_respects_limit_and_orders_by_score() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![
        record("a.pdf", "Mud log for the first well with gas shows through the lateral"),
        record("b.pdf", "Mud log for the second well with weaker shows near the heel"),
        record("c.pdf", "Pipeline right of way agreement with the county commission"),
        record("d.pdf", "Lease operating statement summarizing monthly expenses"),
    ])
    .unwrap();

    let results = kb
        .search("mud log gas shows", 2, SearchMode::Hybrid)
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].score >= results[1].score);

    let all = kb.search("mud log gas shows", 10, SearchMode::Hybrid).unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn test_identical_documents_tie_break_by_insertion_order() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    let text = "Duplicate scan of the same daily drilling report from two folders";
    kb.ingest(vec![record("copy_1.pdf", text), record("copy_2.pdf", text)])
        .unwrap();

    let results = kb
        .search("daily drilling report", 5, SearchMode::Hybrid)
        .unwrap();

    assert_eq!(results[0].document_id, 1);
    assert_eq!(results[1].document_id, 2);
    assert_eq!(results[0].score, results[1].score);
}

#[test]
fn test_empty_store_searches_cleanly() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    assert!(!kb.is_ready());
    assert_eq!(kb.document_count(), 0);

    for mode in [SearchMode::Hybrid, SearchMode::Vector, SearchMode::Keyword] {
        let results = kb.search("anything", 5, mode).unwrap();
        assert!(results.is_empty());
    }
}

#[test]
fn test_unknown_mode_label_behaves_like_vector() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![
        record(
            "wireline.pdf",
            "Wireline logging suite including gamma ray and resistivity curves",
        ),
        record(
            "title.pdf",
            "Title opinion covering the northeast quarter of section twelve",
        ),
    ])
    .unwrap();

    let fallback = kb
        .search("gamma ray suite", 5, SearchMode::from_label("wibble"))
        .unwrap();
    let vector = kb.search("gamma ray suite", 5, SearchMode::Vector).unwrap();

    assert_eq!(fallback.len(), vector.len());
    for (a, b) in fallback.iter().zip(vector.iter()) {
        assert_eq!(a.document_id, b.document_id);
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn test_results_carry_score_breakdown() {
    let temp = TempDir::new().unwrap();
    let kb = open(&temp);

    kb.ingest(vec![record(
        "report.pdf",
        "Well name: Smith #1\nFormation: sandstone with shale stringers\nDepth: 3010 ft",
    )])
    .unwrap();

    let results = kb
        .search("sandstone formation depth", 5, SearchMode::Hybrid)
        .unwrap();

    let breakdown = &results[0].breakdown;
    assert!(!breakdown.vector.is_empty());
    assert!(breakdown.keyword > 0.0);
    assert!(breakdown.semantic > 0.0);
    assert_eq!(results[0].content.lines().count(), 3);
}
