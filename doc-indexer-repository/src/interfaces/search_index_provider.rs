//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch).

use async_trait::async_trait;
use doc_indexer_shared::IndexerType;

use crate::errors::SearchIndexError;
use crate::types::{BulkItem, BulkItemResult};

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch).
///
/// Implementations are injected into `DocumentIndexService`, which owns the
/// document handling (serialization, deduplication, batching, reporting).
/// A provider only moves bytes to and from one cluster and one index.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
///
/// # Index Initialization
///
/// `cluster_health` and `ensure_index_exists` are called once when the service
/// connects, before any document is submitted.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// The backend this provider talks to. Used to label error messages.
    fn indexer_type(&self) -> IndexerType;

    /// The (lowercase) index documents are written to.
    fn index_name(&self) -> &str;

    /// Query cluster health and return the HTTP status code of the response.
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` - The status code; the caller decides what is healthy
    /// * `Err(SearchIndexError::ConnectionError)` - If the request could not be sent
    async fn cluster_health(&self) -> Result<u16, SearchIndexError>;

    /// Ensure the target index exists, creating it with cluster defaults if necessary.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index is ready for use
    /// * `Err(SearchIndexError::IndexCreationError)` - If creation was refused
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Send one `_bulk` request containing `items` as `index` actions.
    ///
    /// # Arguments
    ///
    /// * `items` - Serialized documents with their content-hash ids
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BulkItemResult>)` - Per-item outcomes as reported by the cluster
    /// * `Err(SearchIndexError)` - If the request failed as a whole
    async fn bulk_index(&self, items: &[BulkItem]) -> Result<Vec<BulkItemResult>, SearchIndexError>;
}
