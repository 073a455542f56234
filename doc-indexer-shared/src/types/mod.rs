//! This module defines the configuration types shared by the indexer crates.
//! It re-exports `IndexerType`, `IndexerConfig` and `IndexingOpts`.

pub mod indexer_config;
pub mod indexer_type;
pub mod indexing_opts;

pub use indexer_config::IndexerConfig;
pub use indexer_type::IndexerType;
pub use indexing_opts::IndexingOpts;
