//! Dependency initialization and wiring for the document indexer.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::settings::{ConnectionMode, Settings};
use crate::IndexingError;
use doc_indexer_repository::{build_provider, BulkConfig, DocumentIndexService, SearchIndexError};
use doc_indexer_shared::IndexerConfig;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The connected index service, cluster verified and index present.
    pub service: DocumentIndexService,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If configuration is invalid, or the cluster
    ///   cannot be reached in fail-fast mode
    pub async fn new() -> Result<Self, IndexingError> {
        let settings = Settings::from_env()?;
        Self::from_settings(settings).await
    }

    /// Initialize dependencies from already-parsed settings.
    pub async fn from_settings(settings: Settings) -> Result<Self, IndexingError> {
        info!(
            indexer_type = %settings.indexer.indexer_type,
            servers = ?settings.indexer.resolved_servers(),
            index = %settings.indexer.index,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let service = Self::connect(
            &settings.indexer,
            settings.bulk,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!(index = %service.index_name(), "Search cluster connection established");

        Ok(Self { service })
    }

    /// Connect with retry logic based on connection mode.
    ///
    /// The provider is built once, so an empty index name or an unparsable
    /// server URL fails straight away. Only the cluster checks are retried, and
    /// only for connection failures.
    async fn connect(
        config: &IndexerConfig,
        bulk_config: BulkConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<DocumentIndexService, IndexingError> {
        let provider = build_provider(config)?;
        let service = DocumentIndexService::with_config(provider, bulk_config);

        loop {
            match service.initialize().await {
                Ok(()) => return Ok(service),
                Err(e @ SearchIndexError::ConnectionError(_)) if mode == ConnectionMode::Retry => {
                    warn!(
                        indexer_type = %config.indexer_type,
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Failed to connect to search cluster, retrying..."
                    );
                    sleep(retry_interval).await;
                }
                Err(e) => {
                    error!(
                        indexer_type = %config.indexer_type,
                        error = %e,
                        "Failed to connect to search cluster"
                    );
                    return Err(e.into());
                }
            }
        }
    }
}
