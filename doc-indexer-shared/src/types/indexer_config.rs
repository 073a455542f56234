//! Indexer connection configuration.

use std::env;

use serde::{Deserialize, Serialize};

use super::indexer_type::IndexerType;

/// Address used when neither the configuration nor the environment names a server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9200";

/// Configuration for connecting a document indexer to a search engine cluster.
///
/// # Fields
///
/// - `indexer_type`: Which backend to use (`elastic` or `opensearch`)
/// - `servers`: Cluster addresses; empty means "ask the environment"
/// - `index`: Target index name, lowercased before use
/// - `insecure_skip_verify`: Disable TLS certificate validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndexerConfig {
    #[serde(rename = "type")]
    pub indexer_type: IndexerType,
    #[serde(default)]
    pub servers: Vec<String>,
    pub index: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

impl IndexerConfig {
    /// Create a new configuration with certificate validation enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use doc_indexer_shared::{IndexerConfig, IndexerType};
    ///
    /// let config = IndexerConfig::new(
    ///     IndexerType::OpenSearch,
    ///     vec!["https://search.internal:9200".to_string()],
    ///     "ripsaw-metrics",
    /// );
    /// assert!(!config.insecure_skip_verify);
    /// ```
    pub fn new(indexer_type: IndexerType, servers: Vec<String>, index: impl Into<String>) -> Self {
        Self {
            indexer_type,
            servers,
            index: index.into(),
            insecure_skip_verify: false,
        }
    }

    /// Set whether TLS certificate validation is skipped.
    pub fn with_insecure_skip_verify(mut self, insecure_skip_verify: bool) -> Self {
        self.insecure_skip_verify = insecure_skip_verify;
        self
    }

    /// Server addresses to connect to.
    ///
    /// Falls back to the backend's URL environment variable (comma separated),
    /// then to [`DEFAULT_SERVER_URL`].
    pub fn resolved_servers(&self) -> Vec<String> {
        self.resolve_servers_with(|key| env::var(key).ok())
    }

    fn resolve_servers_with<F>(&self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = split_addresses(self.servers.iter().map(String::as_str));
        if !configured.is_empty() {
            return configured;
        }

        if let Some(value) = lookup(self.indexer_type.url_env_var()) {
            let from_env = split_addresses(value.split(','));
            if !from_env.is_empty() {
                return from_env;
            }
        }

        vec![DEFAULT_SERVER_URL.to_string()]
    }
}

fn split_addresses<'a>(addresses: impl Iterator<Item = &'a str>) -> Vec<String> {
    addresses
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
