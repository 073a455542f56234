//! # Doc Indexer Repository
//!
//! This crate provides traits and implementations for writing documents to a
//! search index. It includes the error type, the provider interface, concrete
//! providers for OpenSearch and Elasticsearch, and the `DocumentIndexService`
//! facade that deduplicates documents by content hash before bulk indexing.

pub mod bulk;
pub mod config;
mod connection;
pub mod dedup;
pub mod elasticsearch;
pub mod errors;
pub mod factory;
pub mod index_config;
pub mod interfaces;
pub mod opensearch;
pub mod service;
#[cfg(test)]
mod test_support;
pub mod types;

pub use config::BulkConfig;
pub use dedup::{content_hash, Deduplicator};
pub use self::elasticsearch::ElasticsearchProvider;
pub use errors::SearchIndexError;
pub use factory::build_provider;
pub use index_config::IndexConfig;
pub use interfaces::SearchIndexProvider;
pub use self::opensearch::OpenSearchProvider;
pub use service::DocumentIndexService;
pub use types::{BulkItem, BulkItemResult, IndexReport, IndexSummary};
