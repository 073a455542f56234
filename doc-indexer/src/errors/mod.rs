//! Error types for loading documents from disk or stdin.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading input documents.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the input is not valid JSON.
    #[error("Invalid JSON document on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The background read did not complete.
    #[error("Loader task failed: {0}")]
    Task(String),
}

impl LoadError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an error for a read task that panicked or was cancelled.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
