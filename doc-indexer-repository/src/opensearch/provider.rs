//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use doc_indexer_shared::IndexerType;
use opensearch::{
    cert::CertificateValidation,
    cluster::ClusterHealthParts,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::bulk;
use crate::connection::primary_server_url;
use crate::errors::SearchIndexError;
use crate::index_config::IndexConfig;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BulkItem, BulkItemResult};

const BACKEND: IndexerType = IndexerType::OpenSearch;

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use doc_indexer_repository::{IndexConfig, OpenSearchProvider, SearchIndexProvider};
///
/// let config = IndexConfig::new("ripsaw-results")?;
/// let provider = OpenSearchProvider::new(&["https://localhost:9200".to_string()], config, true)?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the given servers.
    ///
    /// No request is sent; use `cluster_health` to verify connectivity.
    ///
    /// # Arguments
    ///
    /// * `servers` - Server URLs; the first one is used
    /// * `index_config` - The target index
    /// * `insecure_skip_verify` - Disable TLS certificate validation
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub fn new(
        servers: &[String],
        index_config: IndexConfig,
        insecure_skip_verify: bool,
    ) -> Result<Self, SearchIndexError> {
        let url = primary_server_url(BACKEND, servers)?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if insecure_skip_verify {
            builder = builder.cert_validation(CertificateValidation::None);
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::client_creation(BACKEND, e))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            insecure_skip_verify,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    fn indexer_type(&self) -> IndexerType {
        BACKEND
    }

    fn index_name(&self) -> &str {
        &self.index_config.name
    }

    async fn cluster_health(&self) -> Result<u16, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::health_check(BACKEND, e))?;

        Ok(response.status_code().as_u16())
    }

    /// Create the index when the exists check does not answer 200.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let index = self.index_config.name.as_str();

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::create_index(BACKEND, index, e))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| SearchIndexError::create_index(BACKEND, index, e))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::create_index(BACKEND, index, error_body));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    async fn bulk_index(&self, items: &[BulkItem]) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.name))
            .body(bulk::ndjson_lines(items))
            .send()
            .await
            .map_err(|e| SearchIndexError::unexpected_bulk(BACKEND, e))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::unexpected_bulk(
                BACKEND,
                format!("bulk request failed with status {}: {}", status, error_body),
            ));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        debug!(items = items.len(), "Bulk request completed");
        bulk::parse_bulk_response(&body)
    }
}
