//! Target index configuration.
//!
//! Documents are written to a single index per provider. The index is created
//! with cluster defaults when it does not exist yet.

use crate::errors::SearchIndexError;

/// Configuration for the target search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The index name (always lowercase).
    pub name: String,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// Search engines reject uppercase index names, so the name is lowercased.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name as configured
    ///
    /// # Returns
    ///
    /// * `Ok(IndexConfig)` - With the normalized name
    /// * `Err(SearchIndexError::ValidationError)` - If the name is empty
    pub fn new(name: &str) -> Result<Self, SearchIndexError> {
        if name.is_empty() {
            return Err(SearchIndexError::missing_index_name());
        }
        Ok(Self {
            name: name.to_lowercase(),
        })
    }
}
