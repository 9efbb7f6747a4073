//! Store configuration
//!
//! All store options are carried by an explicit struct handed to the
//! constructor; nothing is discovered or scanned at runtime.

use serde::{Deserialize, Serialize};

/// Configuration for a `PersonStore`
///
/// # Example
///
/// ```rust
/// use persondb::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_initial_capacity(256)
///     .with_case_insensitive_keys(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Initial capacity of the backing map (default: 1024)
    pub initial_capacity: usize,

    /// Treat names case-insensitively as keys (default: false).
    /// The stored record keeps its original spelling.
    pub case_insensitive_keys: bool,

    /// Maximum number of records, 0 = unlimited (default: 0).
    /// New names beyond the cap are rejected; overwrites always pass.
    pub max_records: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            case_insensitive_keys: false,
            max_records: 0,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity of the backing map
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets whether name keys are matched case-insensitively
    pub fn with_case_insensitive_keys(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive_keys = case_insensitive;
        self
    }

    /// Sets the maximum number of records (0 = unlimited)
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert!(!config.case_insensitive_keys);
        assert_eq!(config.max_records, 0);
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = StoreConfig::new()
            .with_initial_capacity(64)
            .with_case_insensitive_keys(true)
            .with_max_records(100);

        assert_eq!(config.initial_capacity, 64);
        assert!(config.case_insensitive_keys);
        assert_eq!(config.max_records, 100);
    }
}
