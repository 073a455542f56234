//! Per-call indexing labels.

use serde::{Deserialize, Serialize};

/// Labels describing where a batch of documents came from.
///
/// They do not change what gets written; they are attached to the logs of the
/// indexing call so runs can be told apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndexingOpts {
    #[serde(default)]
    pub metric_name: String,
    #[serde(default)]
    pub job_name: String,
}

impl IndexingOpts {
    pub fn new(metric_name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            job_name: job_name.into(),
        }
    }
}
