//! User progress snapshot consumed by the ranking engine.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::id::TaskId;
use crate::task::{Difficulty, Task};

/// Default session length in minutes when nothing has been recorded.
pub const DEFAULT_SESSION_MINUTES: f64 = 45.0;

/// Mastery percentage per category.
///
/// Values are always within `[0, 100]`. Looking up a category that has no
/// entry yields `0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct CategoryMastery(BTreeMap<String, f64>);

impl CategoryMastery {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mastery for a category, `0` when unknown.
    pub fn get(&self, category: &str) -> f64 {
        self.0.get(category).copied().unwrap_or(0.0)
    }

    /// Record mastery for a category, clamped to `[0, 100]`.
    pub fn set(&mut self, category: impl Into<String>, percentage: f64) {
        self.0.insert(category.into(), clamp_percentage(percentage));
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, category: impl Into<String>, percentage: f64) -> Self {
        self.set(category, percentage);
        self
    }

    /// Whether a category has an explicit entry.
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Iterate entries in category name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for CategoryMastery {
    fn from(map: BTreeMap<String, f64>) -> Self {
        let mut mastery = Self::new();
        for (category, percentage) in map {
            mastery.set(category, percentage);
        }
        mastery
    }
}

impl From<CategoryMastery> for BTreeMap<String, f64> {
    fn from(mastery: CategoryMastery) -> Self {
        mastery.0
    }
}

fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// A snapshot of a user's progress, rebuilt by the caller whenever the task
/// collection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Finished task ids
    pub completed_task_ids: BTreeSet<TaskId>,

    /// Started but unfinished task ids
    pub in_progress_task_ids: BTreeSet<TaskId>,

    /// Mastery percentage by category
    pub category_mastery: CategoryMastery,

    /// Typical study session length, minutes
    pub average_session_time: f64,

    /// Difficulty the user tends to finish
    pub preferred_difficulty: Difficulty,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            completed_task_ids: BTreeSet::new(),
            in_progress_task_ids: BTreeSet::new(),
            category_mastery: CategoryMastery::new(),
            average_session_time: DEFAULT_SESSION_MINUTES,
            preferred_difficulty: Difficulty::Medium,
        }
    }
}

impl UserProgress {
    /// Whether a task id is in the completed set.
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.completed_task_ids.contains(id)
    }

    /// Mastery for a category, `0` when unknown.
    pub fn mastery(&self, category: &str) -> f64 {
        self.category_mastery.get(category)
    }

    /// Count of a task's prerequisites that are completed.
    pub fn satisfied_prerequisites(&self, task: &Task) -> usize {
        task.prerequisites
            .iter()
            .filter(|id| self.is_completed(id))
            .count()
    }

    /// Fraction of a task's prerequisites that are completed, `1.0` when it
    /// has none. Only membership is checked, never the prerequisites' own
    /// prerequisites.
    pub fn prerequisite_ratio(&self, task: &Task) -> f64 {
        if task.prerequisites.is_empty() {
            return 1.0;
        }
        self.satisfied_prerequisites(task) as f64 / task.prerequisites.len() as f64
    }

    /// Mark ids as completed.
    pub fn with_completed<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.completed_task_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set mastery for a category.
    pub fn with_mastery(mut self, category: impl Into<String>, percentage: f64) -> Self {
        self.category_mastery.set(category, percentage);
        self
    }

    /// Set the preferred difficulty.
    pub fn with_preferred_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.preferred_difficulty = difficulty;
        self
    }

    /// Set the average session time.
    pub fn with_average_session_time(mut self, minutes: f64) -> Self {
        self.average_session_time = minutes;
        self
    }
}
