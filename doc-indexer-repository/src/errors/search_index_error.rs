//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! from client construction through bulk submission.

use doc_indexer_shared::IndexerType;
use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and `DocumentIndexService`. Messages
/// carry the backend label (`ES` or `OpenSearch`) where the failure came from
/// the cluster, so callers can surface them verbatim.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., missing index name).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to build the client or reach a healthy cluster.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to verify or create the target index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Bulk submission failed as a whole.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to parse a response from the cluster.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// The index name was empty.
    pub fn missing_index_name() -> Self {
        Self::validation("index name not specified")
    }

    /// The vendor client could not be constructed.
    pub fn client_creation(backend: IndexerType, cause: impl std::fmt::Display) -> Self {
        Self::connection(format!(
            "error creating the {} client: {}",
            backend.label(),
            cause
        ))
    }

    /// The cluster health request did not complete.
    pub fn health_check(backend: IndexerType, cause: impl std::fmt::Display) -> Self {
        Self::connection(format!("{} health check failed: {}", backend.label(), cause))
    }

    /// The cluster health request returned something other than 200.
    pub fn unexpected_status(backend: IndexerType, status: u16) -> Self {
        Self::connection(format!(
            "unexpected {} status code: {}",
            backend.label(),
            status
        ))
    }

    /// The index could not be created.
    pub fn create_index(backend: IndexerType, index: &str, body: impl std::fmt::Display) -> Self {
        Self::index_creation(format!(
            "error creating index {} on {}: {}",
            index,
            backend.label(),
            body
        ))
    }

    /// A document could not be serialized.
    pub fn encode_document(cause: impl std::fmt::Display) -> Self {
        Self::serialization(format!("Cannot encode document: {}", cause))
    }

    /// The bulk submission failed outright.
    pub fn unexpected_bulk(backend: IndexerType, cause: impl std::fmt::Display) -> Self {
        Self::bulk_index(format!("Unexpected {} error: {}", backend.label(), cause))
    }
}
