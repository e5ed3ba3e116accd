//! Progress builder configuration.

use serde::Deserialize;
use studypath_core::DEFAULT_SESSION_MINUTES;

/// Study categories tracked out of the box.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "System Design",
    "Algorithms",
    "Data Structures",
    "Databases",
    "Testing",
    "DevOps",
];

/// Configuration for [`ProgressBuilder`](crate::ProgressBuilder).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressConfig {
    /// Categories that get a mastery entry, in this order
    pub categories: Vec<String>,

    /// Session length used when no completed task has recorded time
    pub default_session_minutes: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            default_session_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

impl ProgressConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked categories.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fallback session length.
    pub fn with_default_session_minutes(mut self, minutes: f64) -> Self {
        self.default_session_minutes = minutes;
        self
    }
}
