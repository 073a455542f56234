//! Loader module for the document indexer.
//!
//! Reads the documents to index from a file or stdin. Three layouts are
//! accepted: a JSON array (one document per element), a single JSON value
//! (one document), or newline-delimited JSON (one document per non-blank line).

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::LoadError;

/// Path that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Reads JSON documents from files, readers or strings.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load documents from `path`, or from stdin when `path` is `-`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<Value>, LoadError> {
        let path = path.as_ref();
        if path.as_os_str() == STDIN_PATH {
            return Self::from_reader(std::io::stdin().lock(), path);
        }

        let input = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let documents = Self::parse(&input)?;
        debug!(documents = documents.len(), "Loaded documents");
        Ok(documents)
    }

    /// Load documents from any reader. `origin` names the source in errors.
    pub fn from_reader<R: Read>(mut reader: R, origin: &Path) -> Result<Vec<Value>, LoadError> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .map_err(|e| LoadError::io(origin, e))?;
        Self::parse(&input)
    }

    /// Parse documents from an in-memory string.
    ///
    /// Blank input yields no documents.
    ///
    /// ```
    /// use doc_indexer::loader::DocumentLoader;
    ///
    /// let docs = DocumentLoader::parse("{\"a\":1}\n\n{\"a\":2}\n").unwrap();
    /// assert_eq!(docs.len(), 2);
    /// ```
    pub fn parse(input: &str) -> Result<Vec<Value>, LoadError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        if let Ok(value) = serde_json::from_str::<Value>(input) {
            return Ok(match value {
                Value::Array(documents) => documents,
                document => vec![document],
            });
        }

        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str::<Value>(line)
                    .map_err(|e| LoadError::parse(idx + 1, e.to_string()))
            })
            .collect()
    }
}
