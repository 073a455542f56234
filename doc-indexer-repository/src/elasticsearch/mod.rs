//! Elasticsearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using Elasticsearch as the backend.

mod provider;

pub use provider::ElasticsearchProvider;
