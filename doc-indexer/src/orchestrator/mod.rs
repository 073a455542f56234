//! Orchestrator module for the document indexer.
//!
//! Coordinates the loader and the index service for a single run.

use std::path::PathBuf;

use doc_indexer_repository::{DocumentIndexService, IndexReport};
use doc_indexer_shared::IndexingOpts;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::LoadError;
use crate::loader::DocumentLoader;
use crate::IndexingError;

/// One indexing run: load the input, then index it.
pub struct Orchestrator {
    service: DocumentIndexService,
    input: PathBuf,
    opts: IndexingOpts,
}

impl Orchestrator {
    /// Create a new orchestrator for `input` (a file path, or `-` for stdin).
    pub fn new(service: DocumentIndexService, input: impl Into<PathBuf>, opts: IndexingOpts) -> Self {
        Self {
            service,
            input: input.into(),
            opts,
        }
    }

    /// Load every document from the input and index them.
    ///
    /// Nothing is sent when the input cannot be loaded.
    #[instrument(skip(self), fields(input = %self.input.display(), index = %self.service.index_name()))]
    pub async fn run(&self) -> Result<IndexReport, IndexingError> {
        let documents = load_documents(self.input.clone()).await?;
        info!(documents = documents.len(), "Documents loaded");

        let report = self.service.index(&documents, &self.opts).await?;
        info!(report = %report, "Indexing run complete");
        Ok(report)
    }
}

/// Read the input on the blocking pool; file and stdin reads are synchronous.
async fn load_documents(input: PathBuf) -> Result<Vec<Value>, LoadError> {
    tokio::task::spawn_blocking(move || DocumentLoader::from_path(input))
        .await
        .map_err(|e| LoadError::task(e.to_string()))?
}
