//! Request and response types for bulk indexing operations.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::json;

/// A single serialized document queued for a bulk request.
///
/// The `id` is the content hash of `body`, so identical bodies map to the
/// same document in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItem {
    /// Document `_id` (hex SHA-256 of `body`).
    pub id: String,
    /// The serialized JSON document.
    pub body: String,
}

impl BulkItem {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    /// The NDJSON action line preceding the document in a `_bulk` request.
    pub fn action_line(&self) -> String {
        json!({ "index": { "_id": self.id } }).to_string()
    }

    /// Bytes this item occupies in a `_bulk` body, newlines included.
    pub fn encoded_len(&self) -> usize {
        self.action_line().len() + self.body.len() + 2
    }
}

/// Outcome of one item in a bulk response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemResult {
    /// Document `_id` echoed by the cluster.
    pub id: String,
    /// Per-item HTTP status.
    pub status: u16,
    /// Result keyword (`created`, `updated`, `noop`, ...) when present.
    pub result: Option<String>,
    /// Error description (`type: reason`) when the item failed.
    pub error: Option<String>,
}

impl BulkItemResult {
    /// Whether the item was written.
    ///
    /// Matches the vendor bulk helpers: an item fails when it carries an
    /// error or its status is above 201.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status <= 201
    }
}

/// Aggregate statistics for one finished indexing call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSummary {
    /// Wall time spent submitting, truncated to milliseconds.
    pub took: Duration,
    /// Number of unique documents submitted.
    pub submitted: usize,
    /// Successful items counted by their result keyword.
    pub results: BTreeMap<String, usize>,
    /// Items the cluster rejected.
    pub failed: usize,
    /// Documents skipped because an identical body was already submitted.
    pub redundant_skipped: usize,
}

impl IndexSummary {
    /// Count for a result keyword, zero when absent.
    pub fn result_count(&self, result: &str) -> usize {
        self.results.get(result).copied().unwrap_or(0)
    }

    /// Record one bulk item outcome.
    pub fn record(&mut self, item: &BulkItemResult) {
        if item.is_success() {
            let key = item.result.clone().unwrap_or_else(|| "unknown".to_string());
            *self.results.entry(key).or_insert(0) += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// What an indexing call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexReport {
    /// Nothing was sent because there were no documents.
    Skipped { documents: usize },
    /// Documents were submitted.
    Finished(IndexSummary),
}

impl IndexReport {
    /// The summary when documents were submitted.
    pub fn summary(&self) -> Option<&IndexSummary> {
        match self {
            IndexReport::Skipped { .. } => None,
            IndexReport::Finished(summary) => Some(summary),
        }
    }
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexReport::Skipped { documents } => {
                write!(f, "Indexing skipped due to {} docs", documents)
            }
            IndexReport::Finished(summary) => {
                write!(f, "Indexing finished in {}:", HumanDuration(summary.took))?;
                for (result, count) in &summary.results {
                    write!(f, " {}={}", result, count)?;
                }
                if summary.failed > 0 {
                    write!(f, " failed={}", summary.failed)?;
                }
                if summary.redundant_skipped > 0 {
                    write!(f, " redundantskipped={}", summary.redundant_skipped)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders a duration as hours, minutes and seconds (`0s`, `12ms`,
/// `1m2.345s`, `1h0m5s`). Sub-second values use the largest fitting unit.
struct HumanDuration(Duration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < 1_000 {
            return write!(f, "{}ns", nanos);
        }
        if nanos < 1_000_000 {
            return write_scaled(f, nanos, 1_000, "µs");
        }
        if nanos < 1_000_000_000 {
            return write_scaled(f, nanos, 1_000_000, "ms");
        }

        let secs = self.0.as_secs();
        let (hours, minutes) = (secs / 3600, (secs % 3600) / 60);
        if hours > 0 {
            write!(f, "{}h{}m", hours, minutes)?;
        } else if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        write_scaled(
            f,
            u128::from(secs % 60) * 1_000_000_000 + u128::from(self.0.subsec_nanos()),
            1_000_000_000,
            "s",
        )
    }
}

/// Write `value / unit` with trailing fractional zeros dropped.
fn write_scaled(f: &mut fmt::Formatter<'_>, value: u128, unit: u128, suffix: &str) -> fmt::Result {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return write!(f, "{}{}", whole, suffix);
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{:0width$}", frac, width = width);
    write!(f, "{}.{}{}", whole, digits.trim_end_matches('0'), suffix)
}
