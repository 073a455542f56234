//! Configuration types for the DocumentIndexService.

use std::time::Duration;

/// Default size, in bytes, at which a bulk request is flushed.
pub const DEFAULT_FLUSH_BYTES: usize = 5_000_000;

/// Default time budget for one indexing call.
pub const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Bulk submission settings for the DocumentIndexService.
///
/// Controls how documents are grouped into `_bulk` requests, how many requests
/// are in flight at once, and how long a whole indexing call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkConfig {
    /// Maximum size of a single `_bulk` body in bytes.
    ///
    /// A document larger than this is still sent, alone in its own request.
    pub flush_bytes: usize,

    /// Number of bulk requests sent concurrently.
    ///
    /// Defaults to the number of logical CPUs.
    pub num_workers: usize,

    /// Upper bound on the time spent submitting one indexing call.
    pub timeout: Duration,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            flush_bytes: DEFAULT_FLUSH_BYTES,
            num_workers: num_cpus::get().max(1),
            timeout: DEFAULT_BULK_TIMEOUT,
        }
    }
}

impl BulkConfig {
    /// Set the flush threshold in bytes.
    pub fn with_flush_bytes(mut self, flush_bytes: usize) -> Self {
        self.flush_bytes = flush_bytes.max(1);
        self
    }

    /// Set the number of concurrent bulk requests.
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the time budget for an indexing call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
