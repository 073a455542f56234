//! Server address handling shared by the providers.

use doc_indexer_shared::IndexerType;
use tracing::warn;
use url::Url;

use crate::errors::SearchIndexError;

/// Parse the address the provider's single-node connection pool will use.
///
/// The first server is used. Additional servers are reported and ignored.
pub(crate) fn primary_server_url(
    backend: IndexerType,
    servers: &[String],
) -> Result<Url, SearchIndexError> {
    let first = servers
        .first()
        .ok_or_else(|| SearchIndexError::client_creation(backend, "no server address configured"))?;

    if servers.len() > 1 {
        warn!(
            backend = %backend,
            used = %first,
            ignored = servers.len() - 1,
            "Multiple servers configured; using the first one"
        );
    }

    Url::parse(first).map_err(|e| {
        SearchIndexError::client_creation(
            backend,
            format!("cannot parse url {:?}: {}", first, e),
        )
    })
}
