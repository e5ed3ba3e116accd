//! CLI configuration file.

use std::path::Path;
use anyhow::{Context, Result};
use serde::Deserialize;
use studypath_progress::{ProgressBuilder, ProgressConfig};
use studypath_ranking::{EngineConfig, RankingEngine, ScoringConfig};

/// Everything tunable, loaded from one JSON file. Missing sections keep
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudypathConfig {
    /// Scoring weights and thresholds
    pub scoring: ScoringConfig,

    /// Cache and recommendation settings
    pub engine: EngineConfig,

    /// Progress snapshot settings
    pub progress: ProgressConfig,
}

impl StudypathConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load from a file when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Build the progress builder.
    pub fn progress_builder(&self) -> ProgressBuilder {
        ProgressBuilder::new().with_config(self.progress.clone())
    }

    /// Build the ranking engine.
    pub fn engine(&self) -> RankingEngine {
        RankingEngine::with_config(self.engine.clone()).with_scoring(self.scoring.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studypath_ranking::CacheInvalidation;

    #[test]
    fn test_defaults_without_file() {
        let config = StudypathConfig::load_or_default(None).unwrap();
        assert_eq!(config, StudypathConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("studypath.json");
        std::fs::write(
            &path,
            r#"{
                "engine": { "invalidation": { "policy": "contentHash" }, "immediateWindow": 2 },
                "progress": { "categories": ["Rust"] }
            }"#,
        )
        .unwrap();

        let config = StudypathConfig::load(&path).unwrap();
        assert_eq!(config.engine.invalidation, CacheInvalidation::ContentHash);
        assert_eq!(config.engine.immediate_window, 2);
        assert_eq!(config.engine.next_window, 5);
        assert_eq!(config.progress.categories, vec!["Rust".to_string()]);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = StudypathConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
