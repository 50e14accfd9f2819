//! Geosift - Multi-Aspect Retrieval for Geological Well Documents
//!
//! An in-process retrieval and ranking engine: documents are split into
//! labeled sections, embedded per aspect, and ranked by a weighted fusion of
//! vector similarity, lexical overlap, and a synonym-aware semantic signal.
//! The store is append-only and persists to a single snapshot file.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod store;

pub use error::{GeosiftError, Result};
