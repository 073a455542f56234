//! Provider selection by indexer type.

use doc_indexer_shared::{IndexerConfig, IndexerType};

use crate::elasticsearch::ElasticsearchProvider;
use crate::errors::SearchIndexError;
use crate::index_config::IndexConfig;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::OpenSearchProvider;

/// Build the provider named by `config.indexer_type`.
///
/// The index name is validated and lowercased, and server addresses are
/// resolved (configuration, then environment, then localhost). No request is
/// sent to the cluster.
///
/// # Returns
///
/// * `Ok(Box<dyn SearchIndexProvider>)` - The provider, not yet initialized
/// * `Err(SearchIndexError::ValidationError)` - If the index name is empty
/// * `Err(SearchIndexError::ConnectionError)` - If the client cannot be built
pub fn build_provider(
    config: &IndexerConfig,
) -> Result<Box<dyn SearchIndexProvider>, SearchIndexError> {
    let index_config = IndexConfig::new(&config.index)?;
    let servers = config.resolved_servers();

    let provider: Box<dyn SearchIndexProvider> = match config.indexer_type {
        IndexerType::Elastic => Box::new(ElasticsearchProvider::new(
            &servers,
            index_config,
            config.insecure_skip_verify,
        )?),
        IndexerType::OpenSearch => Box::new(OpenSearchProvider::new(
            &servers,
            index_config,
            config.insecure_skip_verify,
        )?),
    };

    Ok(provider)
}
