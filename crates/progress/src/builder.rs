//! Progress snapshot builder.
//!
//! Derives a [`UserProgress`] from the task collection:
//! - completed / in-progress id sets
//! - per-category mastery for a fixed set of categories
//! - average session time from recorded study time
//! - preferred difficulty by majority vote

use std::collections::HashMap;
use studypath_core::{CategoryMastery, Difficulty, Task, TaskStatus, UserProgress};
use tracing::debug;
use crate::config::ProgressConfig;

/// Tie-break order for the preferred difficulty vote.
const DIFFICULTY_TIE_ORDER: [Difficulty; 3] = [Difficulty::Medium, Difficulty::Easy, Difficulty::Hard];

/// Builds progress snapshots from task collections.
#[derive(Debug, Clone, Default)]
pub struct ProgressBuilder {
    config: ProgressConfig,
}

impl ProgressBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Build a snapshot. Never fails; an empty collection yields defaults.
    pub fn build(&self, tasks: &[Task]) -> UserProgress {
        let mut progress = UserProgress {
            category_mastery: self.category_mastery(tasks),
            average_session_time: self.average_session_time(tasks),
            preferred_difficulty: preferred_difficulty(tasks),
            ..Default::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Done => {
                    progress.completed_task_ids.insert(task.id.clone());
                }
                TaskStatus::InProgress => {
                    progress.in_progress_task_ids.insert(task.id.clone());
                }
                TaskStatus::Todo => {}
            }
        }

        debug!(
            "Built progress from {} tasks: {} completed, {} in progress, preferred {}",
            tasks.len(),
            progress.completed_task_ids.len(),
            progress.in_progress_task_ids.len(),
            progress.preferred_difficulty
        );

        progress
    }

    /// Mastery for each configured category.
    fn category_mastery(&self, tasks: &[Task]) -> CategoryMastery {
        // category -> (done, total)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for task in tasks {
            let entry = counts.entry(task.category.as_str()).or_default();
            entry.1 += 1;
            if task.is_done() {
                entry.0 += 1;
            }
        }

        let mut mastery = CategoryMastery::new();
        for category in &self.config.categories {
            let percentage = match counts.get(category.as_str()) {
                Some(&(done, total)) if total > 0 => 100.0 * done as f64 / total as f64,
                _ => 0.0,
            };
            mastery.set(category.clone(), percentage);
        }
        mastery
    }

    /// Mean recorded minutes over completed tasks that have tracking.
    fn average_session_time(&self, tasks: &[Task]) -> f64 {
        let recorded: Vec<f64> = tasks
            .iter()
            .filter(|t| t.is_done())
            .filter_map(Task::recorded_minutes)
            .collect();

        if recorded.is_empty() {
            return self.config.default_session_minutes;
        }

        recorded.iter().sum::<f64>() / recorded.len() as f64
    }
}

/// Majority difficulty among completed tasks; ties go medium, then easy, then hard.
fn preferred_difficulty(tasks: &[Task]) -> Difficulty {
    let mut votes: HashMap<Difficulty, usize> = HashMap::new();
    for task in tasks.iter().filter(|t| t.is_done()) {
        *votes.entry(task.difficulty).or_default() += 1;
    }

    let mut best = DIFFICULTY_TIE_ORDER[0];
    let mut best_votes = votes.get(&best).copied().unwrap_or(0);
    for difficulty in &DIFFICULTY_TIE_ORDER[1..] {
        let count = votes.get(difficulty).copied().unwrap_or(0);
        if count > best_votes {
            best = *difficulty;
            best_votes = count;
        }
    }
    best
}

/// Build a snapshot with the default configuration.
pub fn build_progress(tasks: &[Task]) -> UserProgress {
    ProgressBuilder::new().build(tasks)
}
