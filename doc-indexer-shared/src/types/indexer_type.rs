//! Search engine backend selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an indexer name does not match a known backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Indexer not found: {0}")]
pub struct ParseIndexerTypeError(pub String);

/// The search engine a document indexer talks to.
///
/// Both backends speak the same bulk and index APIs; they differ in the
/// client crate used and in the label that prefixes error messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IndexerType {
    /// Elasticsearch cluster.
    Elastic,
    /// OpenSearch cluster.
    #[default]
    OpenSearch,
}

impl IndexerType {
    /// Canonical configuration name (`elastic` or `opensearch`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexerType::Elastic => "elastic",
            IndexerType::OpenSearch => "opensearch",
        }
    }

    /// Short label used when reporting errors from this backend.
    pub fn label(&self) -> &'static str {
        match self {
            IndexerType::Elastic => "ES",
            IndexerType::OpenSearch => "OpenSearch",
        }
    }

    /// Environment variable consulted for server addresses when none are configured.
    pub fn url_env_var(&self) -> &'static str {
        match self {
            IndexerType::Elastic => "ELASTICSEARCH_URL",
            IndexerType::OpenSearch => "OPENSEARCH_URL",
        }
    }
}

impl fmt::Display for IndexerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexerType {
    type Err = ParseIndexerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elastic" => Ok(IndexerType::Elastic),
            "opensearch" => Ok(IndexerType::OpenSearch),
            _ => Err(ParseIndexerTypeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for IndexerType {
    type Error = ParseIndexerTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
