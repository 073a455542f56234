//! # Doc Indexer Shared
//!
//! This crate defines the backend-neutral configuration types used across the
//! document indexer: which search engine to talk to, where it lives, which
//! index receives the documents, and the labels attached to an indexing call.

pub mod types;

pub use types::indexer_config::{IndexerConfig, DEFAULT_SERVER_URL};
pub use types::indexer_type::{IndexerType, ParseIndexerTypeError};
pub use types::indexing_opts::IndexingOpts;
