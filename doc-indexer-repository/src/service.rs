//! Document index service implementation.
//!
//! This module provides the facade application code uses to push documents
//! into a search index. It serializes documents, drops repeated bodies by
//! content hash, submits the rest through a `SearchIndexProvider` in bulk
//! batches, and reports per-result counts.

use std::time::{Duration, Instant};

use doc_indexer_shared::{IndexerConfig, IndexingOpts};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::bulk;
use crate::config::BulkConfig;
use crate::dedup::Deduplicator;
use crate::errors::SearchIndexError;
use crate::factory::build_provider;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BulkItem, IndexReport, IndexSummary};

/// The main service for indexing documents.
///
/// This is the high-level API that application code should use. Any
/// `Serialize` value can be indexed; each distinct serialized body is written
/// once per call, under an id derived from its SHA-256 hash.
///
/// # Example
///
/// ```no_run
/// use doc_indexer_repository::DocumentIndexService;
/// use doc_indexer_shared::{IndexerConfig, IndexerType, IndexingOpts};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IndexerConfig::new(
///     IndexerType::OpenSearch,
///     vec!["http://localhost:9200".to_string()],
///     "perf-results",
/// );
/// let service = DocumentIndexService::connect(&config).await?;
///
/// let documents = vec![json!({ "uuid": "a1", "value": 3 }), json!({ "uuid": "a1", "value": 3 })];
/// let report = service.index(&documents, &IndexingOpts::new("podLatency", "density")).await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub struct DocumentIndexService {
    provider: Box<dyn SearchIndexProvider>,
    config: BulkConfig,
}

impl DocumentIndexService {
    /// Create a new DocumentIndexService with default bulk settings.
    ///
    /// The provider is used as is; call `initialize` to verify the cluster
    /// and index.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: BulkConfig::default(),
        }
    }

    /// Create a new DocumentIndexService with custom bulk settings.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: BulkConfig) -> Self {
        Self { provider, config }
    }

    /// Build the provider for `config`, check cluster health and ensure the index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentIndexService)` - Ready to index
    /// * `Err(SearchIndexError::ValidationError)` - If the index name is empty
    /// * `Err(SearchIndexError::ConnectionError)` - If the client cannot be built
    ///   or the cluster is unreachable or unhealthy
    /// * `Err(SearchIndexError::IndexCreationError)` - If the index cannot be created
    pub async fn connect(config: &IndexerConfig) -> Result<Self, SearchIndexError> {
        Self::connect_with_config(config, BulkConfig::default()).await
    }

    /// Same as `connect`, with custom bulk settings.
    pub async fn connect_with_config(
        config: &IndexerConfig,
        bulk_config: BulkConfig,
    ) -> Result<Self, SearchIndexError> {
        let provider = build_provider(config)?;
        let service = Self::with_config(provider, bulk_config);
        service.initialize().await?;
        Ok(service)
    }

    /// Verify cluster health (status 200 required) and ensure the index exists.
    pub async fn initialize(&self) -> Result<(), SearchIndexError> {
        let backend = self.provider.indexer_type();

        let status = self.provider.cluster_health().await?;
        if status != 200 {
            return Err(SearchIndexError::unexpected_status(backend, status));
        }

        self.provider.ensure_index_exists().await?;

        info!(
            backend = %backend,
            index = %self.provider.index_name(),
            "Search index ready"
        );
        Ok(())
    }

    /// The index documents are written to.
    pub fn index_name(&self) -> &str {
        self.provider.index_name()
    }

    /// Index documents, writing each distinct body once.
    ///
    /// # Arguments
    ///
    /// * `documents` - Any serializable values
    /// * `opts` - Labels attached to the logs of this call
    ///
    /// # Returns
    ///
    /// * `Ok(IndexReport::Skipped)` - If `documents` is empty; nothing is sent
    /// * `Ok(IndexReport::Finished)` - With per-result counts, failed items and
    ///   the number of repeated bodies skipped
    /// * `Err(SearchIndexError::SerializationError)` - If a document cannot be
    ///   encoded; nothing is sent
    /// * `Err(SearchIndexError::BulkIndexError)` - If a bulk request fails or
    ///   the call exceeds the configured timeout
    #[instrument(
        skip(self, documents, opts),
        fields(
            documents = documents.len(),
            index = %self.provider.index_name(),
            metric_name = %opts.metric_name,
            job_name = %opts.job_name
        )
    )]
    pub async fn index<T>(
        &self,
        documents: &[T],
        opts: &IndexingOpts,
    ) -> Result<IndexReport, SearchIndexError>
    where
        T: Serialize + Sync,
    {
        if documents.is_empty() {
            return Ok(IndexReport::Skipped {
                documents: documents.len(),
            });
        }

        let start = Instant::now();
        let mut dedup = Deduplicator::new();
        let mut items = Vec::with_capacity(documents.len());
        for document in documents {
            let body = serde_json::to_string(document).map_err(SearchIndexError::encode_document)?;
            if let Some(id) = dedup.admit(body.as_bytes()) {
                items.push(BulkItem { id, body });
            }
        }
        debug!(
            unique = dedup.unique(),
            redundant_skipped = dedup.redundant_skipped(),
            "Documents encoded"
        );

        let mut summary = self.submit(items).await?;
        summary.took = truncate_to_millis(start.elapsed());
        summary.redundant_skipped = dedup.redundant_skipped();

        if summary.failed > 0 {
            warn!(failed = summary.failed, "Some documents were rejected");
        }

        let report = IndexReport::Finished(summary);
        info!(summary = %report, "Indexing finished");
        Ok(report)
    }

    /// Send items in size-bounded batches, `num_workers` at a time, within the timeout.
    async fn submit(&self, items: Vec<BulkItem>) -> Result<IndexSummary, SearchIndexError> {
        let backend = self.provider.indexer_type();
        let submitted = items.len();
        let workers = self.config.num_workers.max(1);
        let batches = bulk::split_into_batches(items, self.config.flush_bytes);
        debug!(
            submitted,
            batches = batches.len(),
            workers,
            "Submitting bulk batches"
        );

        let provider = self.provider.as_ref();
        let submissions = stream::iter(batches)
            .map(|batch| async move { provider.bulk_index(&batch).await })
            .buffer_unordered(workers)
            .try_fold(
                IndexSummary {
                    submitted,
                    ..Default::default()
                },
                |mut summary, results| async move {
                    for result in &results {
                        if !result.is_success() {
                            debug!(
                                id = %result.id,
                                status = result.status,
                                error = ?result.error,
                                "Document rejected"
                            );
                        }
                        summary.record(result);
                    }
                    Ok::<_, SearchIndexError>(summary)
                },
            );

        timeout(self.config.timeout, submissions)
            .await
            .map_err(|_| {
                SearchIndexError::unexpected_bulk(
                    backend,
                    format!("bulk indexing timed out after {:?}", self.config.timeout),
                )
            })?
    }
}

fn truncate_to_millis(duration: Duration) -> Duration {
    Duration::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::content_hash;
    use crate::types::BulkItemResult;
    use async_trait::async_trait;
    use doc_indexer_shared::IndexerType;
    use serde::ser::Error as _;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// How the mock answers bulk requests.
    #[derive(Clone, Copy)]
    enum BulkBehavior {
        /// Every item is created.
        Create,
        /// Items whose body contains "reject" fail with status 400.
        RejectMarked,
        /// The request itself fails.
        Fail,
        /// The request never completes.
        Hang,
    }

    /// Mock provider for testing
    struct MockProvider {
        indexer_type: IndexerType,
        health_status: u16,
        behavior: BulkBehavior,
        batches: Arc<Mutex<Vec<Vec<BulkItem>>>>,
        ensure_calls: Arc<Mutex<usize>>,
    }

    impl MockProvider {
        fn new(behavior: BulkBehavior) -> Self {
            Self {
                indexer_type: IndexerType::Elastic,
                health_status: 200,
                behavior,
                batches: Arc::new(Mutex::new(Vec::new())),
                ensure_calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        fn indexer_type(&self) -> IndexerType {
            self.indexer_type
        }

        fn index_name(&self) -> &str {
            "perf-results"
        }

        async fn cluster_health(&self) -> Result<u16, SearchIndexError> {
            Ok(self.health_status)
        }

        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            *self.ensure_calls.lock().unwrap() += 1;
            Ok(())
        }

        async fn bulk_index(
            &self,
            items: &[BulkItem],
        ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
            match self.behavior {
                BulkBehavior::Fail => {
                    return Err(SearchIndexError::unexpected_bulk(
                        self.indexer_type,
                        "connection reset",
                    ))
                }
                BulkBehavior::Hang => std::future::pending::<()>().await,
                _ => {}
            }

            self.batches.lock().unwrap().push(items.to_vec());

            Ok(items
                .iter()
                .map(|item| {
                    let rejected = matches!(self.behavior, BulkBehavior::RejectMarked)
                        && item.body.contains("reject");
                    if rejected {
                        BulkItemResult {
                            id: item.id.clone(),
                            status: 400,
                            result: None,
                            error: Some("mapper_parsing_exception: bad field".to_string()),
                        }
                    } else {
                        BulkItemResult {
                            id: item.id.clone(),
                            status: 201,
                            result: Some("created".to_string()),
                            error: None,
                        }
                    }
                })
                .collect())
        }
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("channels cannot be encoded"))
        }
    }

    /// Takes a fixed time to encode.
    struct SlowToEncode(u32);

    impl Serialize for SlowToEncode {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            std::thread::sleep(Duration::from_millis(20));
            serializer.serialize_u32(self.0)
        }
    }

    #[derive(Serialize)]
    #[serde(untagged)]
    enum MixedDocument {
        Json(serde_json::Value),
        Broken(Unencodable),
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Person {
        name: String,
        age: u32,
    }

    fn sample_documents() -> Vec<serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("key1", json!("value1"));
        map.insert("key2", json!(123));
        map.insert("key3", json!(true));

        vec![
            json!("example document"),
            json!(42),
            json!(2.5),
            json!(false),
            serde_json::to_value(Person {
                name: "John Doe".to_string(),
                age: 25,
            })
            .unwrap(),
            serde_json::to_value(map).unwrap(),
        ]
    }

    fn opts() -> IndexingOpts {
        IndexingOpts::new("placeholder", "placeholder")
    }

    #[tokio::test]
    async fn test_index_empty_is_skipped() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let batches = provider.batches.clone();
        let service = DocumentIndexService::new(Box::new(provider));

        let documents: Vec<serde_json::Value> = vec![];
        let report = service.index(&documents, &opts()).await.unwrap();

        assert_eq!(report, IndexReport::Skipped { documents: 0 });
        assert_eq!(report.to_string(), "Indexing skipped due to 0 docs");
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_heterogeneous_documents() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let service = DocumentIndexService::new(Box::new(provider));

        let report = service.index(&sample_documents(), &opts()).await.unwrap();
        let summary = report.summary().unwrap();

        assert_eq!(summary.submitted, 6);
        assert_eq!(summary.result_count("created"), 6);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.redundant_skipped, 0);
        assert!(report.to_string().starts_with("Indexing finished in "));
        assert!(report.to_string().ends_with(": created=6"));
    }

    #[tokio::test]
    async fn test_index_deduplicates_by_content() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let batches = provider.batches.clone();
        let service = DocumentIndexService::new(Box::new(provider));

        let documents = vec![
            json!({"pod": "a", "latency": 10}),
            json!({"pod": "a", "latency": 10}),
            json!({"pod": "b", "latency": 12}),
            json!({"pod": "a", "latency": 10}),
            json!({"pod": "b", "latency": 12}),
            json!({"pod": "c", "latency": 9}),
        ];

        let report = service.index(&documents, &opts()).await.unwrap();
        let summary = report.summary().unwrap();
        assert_eq!(summary.submitted, 3);
        assert_eq!(summary.result_count("created"), 3);
        assert_eq!(summary.redundant_skipped, 3);
        assert!(report.to_string().ends_with(" created=3 redundantskipped=3"));

        let sent: Vec<BulkItem> = batches.lock().unwrap().concat();
        let ids: Vec<&str> = sent.iter().map(|item| item.id.as_str()).collect();
        let expected_c = serde_json::to_string(&json!({"pod": "c", "latency": 9})).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[2], content_hash(expected_c.as_bytes()));
        for item in &sent {
            assert_eq!(item.id, content_hash(item.body.as_bytes()));
        }
    }

    #[tokio::test]
    async fn test_index_encode_failure_sends_nothing() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let batches = provider.batches.clone();
        let service = DocumentIndexService::new(Box::new(provider));

        let documents = vec![
            MixedDocument::Json(json!("example document")),
            MixedDocument::Broken(Unencodable),
        ];

        let err = service.index(&documents, &opts()).await.unwrap_err();
        assert!(matches!(err, SearchIndexError::SerializationError(_)));
        assert!(err.to_string().contains("Cannot encode document"));
        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_counts_rejected_items() {
        let provider = MockProvider::new(BulkBehavior::RejectMarked);
        let service = DocumentIndexService::new(Box::new(provider));

        let documents = vec![json!({"ok": 1}), json!({"reject": 2}), json!({"ok": 3})];
        let report = service.index(&documents, &opts()).await.unwrap();
        let summary = report.summary().unwrap();

        assert_eq!(summary.result_count("created"), 2);
        assert_eq!(summary.failed, 1);
        assert!(report.to_string().ends_with(" created=2 failed=1"));
    }

    #[tokio::test]
    async fn test_index_bulk_failure_is_surfaced() {
        let provider = MockProvider::new(BulkBehavior::Fail);
        let service = DocumentIndexService::new(Box::new(provider));

        let err = service
            .index(&sample_documents(), &opts())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchIndexError::BulkIndexError(_)));
        assert!(err.to_string().contains("Unexpected ES error: connection reset"));
    }

    #[tokio::test]
    async fn test_index_splits_batches_by_flush_bytes() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let batches = provider.batches.clone();
        let config = BulkConfig::default()
            .with_flush_bytes(1)
            .with_num_workers(2);
        let service = DocumentIndexService::with_config(Box::new(provider), config);

        let documents: Vec<serde_json::Value> = (0..5).map(|i| json!({ "n": i })).collect();
        let report = service.index(&documents, &opts()).await.unwrap();

        assert_eq!(report.summary().unwrap().result_count("created"), 5);
        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 5);
        assert!(batches.iter().all(|batch| batch.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_times_out() {
        let provider = MockProvider::new(BulkBehavior::Hang);
        let config = BulkConfig::default().with_timeout(Duration::from_secs(5));
        let service = DocumentIndexService::with_config(Box::new(provider), config);

        let err = service
            .index(&sample_documents(), &opts())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchIndexError::BulkIndexError(_)));
        assert!(err.to_string().contains("timed out after 5s"));
    }

    #[tokio::test]
    async fn test_index_took_includes_encoding() {
        let service = DocumentIndexService::new(Box::new(MockProvider::new(BulkBehavior::Create)));

        let documents = [SlowToEncode(1), SlowToEncode(2)];
        let report = service.index(&documents, &opts()).await.unwrap();

        assert!(report.summary().unwrap().took >= Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_with_zero_workers_still_submits() {
        let provider = MockProvider::new(BulkBehavior::Create);
        let config = BulkConfig {
            num_workers: 0,
            ..Default::default()
        }
        .with_timeout(Duration::from_secs(3));
        let service = DocumentIndexService::with_config(Box::new(provider), config);

        let report = service.index(&sample_documents(), &opts()).await.unwrap();
        assert!(report.summary().unwrap().result_count("created") > 0);
    }

    #[tokio::test]
    async fn test_initialize_rejects_unhealthy_cluster() {
        let mut provider = MockProvider::new(BulkBehavior::Create);
        provider.health_status = 400;
        let ensure_calls = provider.ensure_calls.clone();
        let service = DocumentIndexService::new(Box::new(provider));

        let err = service.initialize().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection error: unexpected ES status code: 400"
        );
        assert_eq!(*ensure_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initialize_ensures_index() {
        let mut provider = MockProvider::new(BulkBehavior::Create);
        provider.indexer_type = IndexerType::OpenSearch;
        let ensure_calls = provider.ensure_calls.clone();
        let service = DocumentIndexService::new(Box::new(provider));

        service.initialize().await.unwrap();
        assert_eq!(*ensure_calls.lock().unwrap(), 1);
        assert_eq!(service.index_name(), "perf-results");
    }

    #[tokio::test]
    async fn test_connect_requires_index_name() {
        let config = IndexerConfig::new(
            IndexerType::Elastic,
            vec!["http://localhost:9200".to_string()],
            "",
        );
        let err = DocumentIndexService::connect(&config).await.err().unwrap();
        assert!(matches!(err, SearchIndexError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_connect_unreachable_cluster() {
        let config = IndexerConfig::new(
            IndexerType::OpenSearch,
            vec!["http://127.0.0.1:1".to_string()],
            "perf-results",
        );
        let err = DocumentIndexService::connect(&config).await.err().unwrap();
        assert!(err.to_string().contains("OpenSearch health check failed"));
    }

    #[test]
    fn test_truncate_to_millis() {
        assert_eq!(
            truncate_to_millis(Duration::from_micros(1_234_567)),
            Duration::from_millis(1234)
        );
    }
}
