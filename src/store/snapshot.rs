//! Single-file snapshot persistence
//!
//! The whole store is serialized to one zstd-compressed JSON file with a
//! header carrying the format version, the embedding model, the vector
//! dimension, and a checksum over the document payload. Writes go through a
//! temp file and an atomic rename so a crash mid-save leaves the previous
//! snapshot intact.

use crate::embedding::Aspect;
use crate::store::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Bumped whenever the on-disk layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Zstd compression level for snapshot files.
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The file exists but cannot be trusted
    #[error("Corrupt snapshot at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Persisted vectors were produced at a different dimension than the
    /// active provider emits
    #[error("Snapshot embedding dimension {actual} does not match provider dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },
}

/// A loaded snapshot, validated and ready to rehydrate a store.
#[derive(Debug)]
pub struct Snapshot {
    pub model: String,
    pub dimension: usize,
    pub saved_at: DateTime<Utc>,
    pub documents: Vec<Document>,
}

/// On-disk envelope, borrowed for writing.
#[derive(Serialize)]
struct SnapshotFile<'a> {
    version: u32,
    model: &'a str,
    dimension: usize,
    saved_at: DateTime<Utc>,
    checksum: String,
    documents: Vec<&'a Document>,
}

/// On-disk envelope, owned after parsing.
#[derive(Deserialize)]
struct SnapshotFileOwned {
    version: u32,
    model: String,
    dimension: usize,
    saved_at: DateTime<Utc>,
    checksum: String,
    documents: Vec<Document>,
}

/// Write a snapshot atomically: temp file, fsync, rename.
pub fn write(
    path: &Path,
    documents: &[Arc<Document>],
    model: &str,
    dimension: usize,
) -> Result<(), SnapshotError> {
    let refs: Vec<&Document> = documents.iter().map(Arc::as_ref).collect();
    let canonical = serde_json::to_vec(&refs)?;

    let envelope = SnapshotFile {
        version: SNAPSHOT_VERSION,
        model,
        dimension,
        saved_at: Utc::now(),
        checksum: checksum(&canonical),
        documents: refs,
    };
    let encoded = serde_json::to_vec(&envelope)?;
    let compressed = zstd::encode_all(encoded.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| io_error(e, "compressing snapshot".to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| io_error(e, format!("creating {}", parent.display())))?;
        }
    }

    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path)
        .map_err(|e| io_error(e, format!("creating {}", temp_path.display())))?;
    file.write_all(&compressed)
        .map_err(|e| io_error(e, format!("writing {}", temp_path.display())))?;
    file.sync_all()
        .map_err(|e| io_error(e, format!("syncing {}", temp_path.display())))?;
    fs::rename(&temp_path, path)
        .map_err(|e| io_error(e, format!("renaming into {}", path.display())))?;

    tracing::debug!(
        "Wrote snapshot with {} documents to {}",
        envelope.documents.len(),
        path.display()
    );
    Ok(())
}

/// Read and validate a snapshot. An absent file is not an error; the caller
/// starts from an empty store.
pub fn read(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }

    let compressed =
        fs::read(path).map_err(|e| io_error(e, format!("reading {}", path.display())))?;
    let encoded = zstd::decode_all(compressed.as_slice())
        .map_err(|e| corrupt(path, format!("decompression failed: {e}")))?;
    let envelope: SnapshotFileOwned = serde_json::from_slice(&encoded)
        .map_err(|e| corrupt(path, format!("invalid JSON: {e}")))?;

    if envelope.version != SNAPSHOT_VERSION {
        return Err(corrupt(
            path,
            format!("unsupported snapshot version {}", envelope.version),
        ));
    }

    let canonical = serde_json::to_vec(&envelope.documents)?;
    if checksum(&canonical) != envelope.checksum {
        return Err(corrupt(path, "checksum mismatch".to_string()));
    }

    for doc in &envelope.documents {
        if !doc.aspects.contains_key(&Aspect::FullText) {
            return Err(corrupt(
                path,
                format!("document {} has no full_text embedding", doc.id),
            ));
        }
        for (aspect, vector) in &doc.aspects {
            if vector.len() != envelope.dimension {
                return Err(corrupt(
                    path,
                    format!(
                        "document {} aspect {} has dimension {}, header says {}",
                        doc.id,
                        aspect,
                        vector.len(),
                        envelope.dimension
                    ),
                ));
            }
        }
    }

    Ok(Some(Snapshot {
        model: envelope.model,
        dimension: envelope.dimension,
        saved_at: envelope.saved_at,
        documents: envelope.documents,
    }))
}

/// Blake3 over the canonical document payload, truncated to 32 hex chars.
fn checksum(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    format!("{:.32}", hash.to_hex())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

fn corrupt(path: &Path, reason: String) -> SnapshotError {
    SnapshotError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}

fn io_error(source: std::io::Error, context: String) -> SnapshotError {
    SnapshotError::Io { source, context }
}
