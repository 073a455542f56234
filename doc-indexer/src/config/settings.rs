//! Environment-driven settings for the document indexer.

use std::env;
use std::time::Duration;

use doc_indexer_repository::BulkConfig;
use doc_indexer_shared::{IndexerConfig, IndexerType};
use tracing::warn;

use crate::IndexingError;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default bulk timeout in seconds.
const DEFAULT_BULK_TIMEOUT_SECS: u64 = 600;

/// Connection mode for the search cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry the connection until it succeeds.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Everything needed to connect and index.
#[derive(Debug, Clone)]
pub struct Settings {
    pub indexer: IndexerConfig,
    pub bulk: BulkConfig,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INDEXER_TYPE`: "elastic" or "opensearch" (default: opensearch)
    /// - `INDEXER_SERVERS`: Comma-separated server URLs (default: backend URL variable, then localhost)
    /// - `INDEXER_INDEX`: Target index name (required)
    /// - `INDEXER_INSECURE_SKIP_VERIFY`: Skip TLS certificate validation (default: false)
    /// - `BULK_FLUSH_BYTES`: Bulk request size threshold (default: 5000000)
    /// - `BULK_NUM_WORKERS`: Concurrent bulk requests (default: number of CPUs)
    /// - `BULK_TIMEOUT_SECS`: Time budget per indexing call (default: 600)
    /// - `CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `CONNECTION_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let indexer_type = match lookup("INDEXER_TYPE") {
            Some(value) => value
                .parse::<IndexerType>()
                .map_err(|e| IndexingError::config(e.to_string()))?,
            None => IndexerType::default(),
        };

        let servers = lookup("INDEXER_SERVERS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let index = lookup("INDEXER_INDEX").unwrap_or_default();
        let insecure_skip_verify = lookup("INDEXER_INSECURE_SKIP_VERIFY")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);

        let indexer = IndexerConfig::new(indexer_type, servers, index)
            .with_insecure_skip_verify(insecure_skip_verify);

        let mut bulk = BulkConfig::default().with_timeout(Duration::from_secs(
            parse_number(&lookup, "BULK_TIMEOUT_SECS").unwrap_or(DEFAULT_BULK_TIMEOUT_SECS),
        ));
        if let Some(flush_bytes) = parse_number(&lookup, "BULK_FLUSH_BYTES") {
            bulk = bulk.with_flush_bytes(flush_bytes);
        }
        if let Some(num_workers) = parse_number(&lookup, "BULK_NUM_WORKERS") {
            bulk = bulk.with_num_workers(num_workers);
        }

        let connection_mode = ConnectionMode::parse(lookup("CONNECTION_MODE"));
        let retry_interval = Duration::from_secs(
            parse_number(&lookup, "CONNECTION_RETRY_INTERVAL_SECS")
                .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS),
        );

        Ok(Self {
            indexer,
            bulk,
            connection_mode,
            retry_interval,
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_number<F, N>(lookup: &F, key: &str) -> Option<N>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr,
{
    let value = lookup(key)?;
    match value.trim().parse::<N>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key, value = %value, "Ignoring invalid numeric setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[("INDEXER_INDEX", "perf")])).unwrap();

        assert_eq!(settings.indexer.indexer_type, IndexerType::OpenSearch);
        assert!(settings.indexer.servers.is_empty());
        assert_eq!(settings.indexer.index, "perf");
        assert!(!settings.indexer.insecure_skip_verify);
        assert_eq!(settings.bulk.flush_bytes, 5_000_000);
        assert_eq!(settings.bulk.timeout, Duration::from_secs(600));
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_full_settings() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("INDEXER_TYPE", "elastic"),
            ("INDEXER_SERVERS", "https://es-1:9200, https://es-2:9200"),
            ("INDEXER_INDEX", "Kube-Burner"),
            ("INDEXER_INSECURE_SKIP_VERIFY", "true"),
            ("BULK_FLUSH_BYTES", "1024"),
            ("BULK_NUM_WORKERS", "3"),
            ("BULK_TIMEOUT_SECS", "30"),
            ("CONNECTION_MODE", "fail-fast"),
            ("CONNECTION_RETRY_INTERVAL_SECS", "2"),
        ]))
        .unwrap();

        assert_eq!(settings.indexer.indexer_type, IndexerType::Elastic);
        assert_eq!(
            settings.indexer.servers,
            vec!["https://es-1:9200".to_string(), "https://es-2:9200".to_string()]
        );
        assert!(settings.indexer.insecure_skip_verify);
        assert_eq!(settings.bulk.flush_bytes, 1024);
        assert_eq!(settings.bulk.num_workers, 3);
        assert_eq!(settings.bulk.timeout, Duration::from_secs(30));
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.retry_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_unknown_indexer_type() {
        let err = Settings::from_lookup(lookup_from(&[("INDEXER_TYPE", "solr")])).unwrap_err();
        assert!(err.to_string().contains("Indexer not found: solr"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("BULK_TIMEOUT_SECS", "soon"),
            ("CONNECTION_RETRY_INTERVAL_SECS", "-1"),
        ]))
        .unwrap();
        assert_eq!(settings.bulk.timeout, Duration::from_secs(600));
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_connection_mode_parse() {
        assert_eq!(
            ConnectionMode::parse(Some("FailFast".to_string())),
            ConnectionMode::FailFast
        );
        assert_eq!(ConnectionMode::parse(None), ConnectionMode::Retry);
        assert_eq!(
            ConnectionMode::parse(Some("sometimes".to_string())),
            ConnectionMode::Retry
        );
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
