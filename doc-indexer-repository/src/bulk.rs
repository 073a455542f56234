//! Bulk request framing shared by the OpenSearch and Elasticsearch providers.
//!
//! Both engines accept the same `_bulk` NDJSON body and answer with the same
//! `items` array, so batching and response parsing live here.

use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkItem, BulkItemResult};

/// Split items into batches whose encoded size stays within `flush_bytes`.
///
/// Order is preserved. An item larger than `flush_bytes` is placed in a batch
/// of its own. Empty batches are never produced.
pub fn split_into_batches(items: Vec<BulkItem>, flush_bytes: usize) -> Vec<Vec<BulkItem>> {
    let mut batches = Vec::new();
    let mut current = Vec::new();
    let mut current_bytes = 0;

    for item in items {
        let size = item.encoded_len();
        if !current.is_empty() && current_bytes + size > flush_bytes {
            batches.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current_bytes += size;
        current.push(item);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

/// Build the NDJSON lines for a `_bulk` request: action line, then document.
pub fn ndjson_lines(items: &[BulkItem]) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len() * 2);
    for item in items {
        lines.push(item.action_line());
        lines.push(item.body.clone());
    }
    lines
}

/// Parse the `items` array of a `_bulk` response.
///
/// # Returns
///
/// * `Ok(Vec<BulkItemResult>)` - One entry per response item, in response order
/// * `Err(SearchIndexError::ParseError)` - If the response has no `items` array
pub fn parse_bulk_response(body: &Value) -> Result<Vec<BulkItemResult>, SearchIndexError> {
    let items = body["items"]
        .as_array()
        .ok_or_else(|| SearchIndexError::parse("bulk response has no items array"))?;

    Ok(items.iter().filter_map(parse_item).collect())
}

fn parse_item(item: &Value) -> Option<BulkItemResult> {
    // Each item is keyed by its action: {"index": {...}}
    let (_, info) = item.as_object()?.iter().next()?;

    Some(BulkItemResult {
        id: info["_id"].as_str().unwrap_or_default().to_string(),
        status: info["status"]
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0),
        result: info["result"].as_str().map(str::to_string),
        error: describe_error(&info["error"]),
    })
}

fn describe_error(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or("error");
            let reason = obj.get("reason").and_then(Value::as_str).unwrap_or_default();
            Some(format!("{}: {}", kind, reason))
        }
        other => Some(other.to_string()),
    }
}
