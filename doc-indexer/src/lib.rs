//! # Document Indexer
//!
//! Loads JSON documents and bulk indexes them into OpenSearch or
//! Elasticsearch, writing each distinct document body once.
//!
//! ## Architecture
//!
//! 1. **Loader**: Reads documents from a file or stdin
//! 2. **Service**: Deduplicates and bulk indexes them (see `doc_indexer_repository`)
//! 3. **Orchestrator**: Coordinates a single run
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`loader`]: Reads JSON, JSON array or NDJSON input
//! - [`orchestrator`]: Coordinates the run
//! - [`errors`]: Error types for loading input

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;

pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::LoadError;
pub use loader::DocumentLoader;
pub use orchestrator::Orchestrator;

use doc_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The input documents could not be loaded.
    #[error("Load error: {0}")]
    LoadError(#[from] LoadError),

    /// The search cluster rejected or failed the run.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
