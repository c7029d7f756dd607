//! Folder-match configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for duplicate-folder matching.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct MatchConfig {
    /// Directory names never used as a comparison subject.
    ///
    /// Their files stay in the global hash index, so they can still
    /// show up as matches found from other directories.
    #[builder(default = "default_excluded()")]
    #[serde(default = "default_excluded")]
    pub excluded_dirs: Vec<String>,
}

fn default_excluded() -> Vec<String> {
    vec![".git".to_string(), ".svn".to_string()]
}

impl MatchConfig {
    /// Create a new config builder.
    pub fn builder() -> MatchConfigBuilder {
        MatchConfigBuilder::default()
    }

    /// Whether `name` is excluded from being compared.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let config = MatchConfig::default();
        assert!(config.is_excluded(".git"));
        assert!(config.is_excluded(".svn"));
        assert!(!config.is_excluded("src"));
    }

    #[test]
    fn test_builder_replaces_exclusions() {
        let config = MatchConfig::builder()
            .excluded_dirs(vec!["node_modules".to_string()])
            .build()
            .unwrap();
        assert!(config.is_excluded("node_modules"));
        assert!(!config.is_excluded(".git"));
    }
}
