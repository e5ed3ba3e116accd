//! Task scoring.
//!
//! A task's priority is a fixed-weight linear sum of six factors:
//!
//! ```text
//! score = 0.35 * prerequisites      (satisfied / total)^2
//!       + 0.25 * difficulty         tier base, preference bonus, weak-category penalty
//!       + 0.20 * learning_path      1 - learning_order / 100
//!       + 0.10 * category_balance   1 - mastery / 100
//!       + 0.05 * time_efficiency    fit within the average session
//!       + 0.05 * mastery_gap        1 - mastery / 100, halved for hard beginner tasks
//! ```
//!
//! Done tasks short-circuit to exactly zero.

use studypath_core::{Difficulty, ScoreBreakdown, Task, TaskScore, UserProgress};
use crate::config::ScoringConfig;

/// Computes [`TaskScore`]s. Pure: the result depends only on the task, the
/// progress snapshot, and the configuration.
#[derive(Debug, Clone, Default)]
pub struct TaskScorer {
    config: ScoringConfig,
}

impl TaskScorer {
    /// Create a scorer with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with a custom configuration.
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one task against a progress snapshot.
    pub fn score(&self, task: &Task, progress: &UserProgress) -> TaskScore {
        if task.is_done() {
            return TaskScore::zero(task.id.clone());
        }

        let mastery = progress.mastery(&task.category);
        let breakdown = ScoreBreakdown {
            prerequisites: self.prerequisite_factor(task, progress),
            difficulty: self.difficulty_factor(task, progress, mastery),
            learning_path: self.learning_path_factor(task),
            category_balance: self.category_balance_factor(mastery),
            time_efficiency: self.time_efficiency_factor(task, progress),
            mastery_gap: self.mastery_gap_factor(task, mastery),
        };

        TaskScore {
            task_id: task.id.clone(),
            score: self.combine(&breakdown),
            breakdown,
        }
    }

    /// Weighted sum of the factors.
    pub fn combine(&self, breakdown: &ScoreBreakdown) -> f64 {
        let w = &self.config.weights;
        breakdown.prerequisites * w.prerequisites
            + breakdown.difficulty * w.difficulty
            + breakdown.learning_path * w.learning_path
            + breakdown.category_balance * w.category_balance
            + breakdown.time_efficiency * w.time_efficiency
            + breakdown.mastery_gap * w.mastery_gap
    }

    /// Squared so partial completion counts for much less than full completion.
    fn prerequisite_factor(&self, task: &Task, progress: &UserProgress) -> f64 {
        progress.prerequisite_ratio(task).powi(2)
    }

    fn difficulty_factor(&self, task: &Task, progress: &UserProgress, mastery: f64) -> f64 {
        let mut value = self.config.tiers.base(task.difficulty);

        if task.difficulty == progress.preferred_difficulty {
            value += self.config.preferred_bonus;
        }

        if task.difficulty == Difficulty::Hard && mastery < self.config.weak_category_threshold {
            value -= self.config.weak_category_penalty;
        }

        value.max(0.0)
    }

    fn learning_path_factor(&self, task: &Task) -> f64 {
        let order = task
            .learning_order
            .map(f64::from)
            .unwrap_or(self.config.default_learning_order);
        1.0 - order / self.config.learning_order_scale
    }

    fn category_balance_factor(&self, mastery: f64) -> f64 {
        1.0 - mastery / 100.0
    }

    fn time_efficiency_factor(&self, task: &Task, progress: &UserProgress) -> f64 {
        let estimated = f64::from(task.estimated_time);
        let session = progress.average_session_time;

        if estimated <= session {
            self.config.session_fit
        } else if estimated <= session * self.config.stretch_session_multiplier {
            self.config.stretch_fit
        } else {
            self.config.overlong_fit
        }
    }

    fn mastery_gap_factor(&self, task: &Task, mastery: f64) -> f64 {
        let gap = 1.0 - mastery / 100.0;
        if mastery < self.config.beginner_threshold && task.difficulty == Difficulty::Hard {
            gap * self.config.beginner_hard_factor
        } else {
            gap
        }
    }
}

/// Score a task with the default configuration.
pub fn score(task: &Task, progress: &UserProgress) -> TaskScore {
    TaskScorer::new().score(task, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studypath_core::TaskStatus;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn easy_js(id: &str) -> Task {
        Task::new(id, "JS", Difficulty::Easy, 30)
    }

    #[test]
    fn test_done_task_scores_zero() {
        let task = easy_js("a").with_status(TaskStatus::Done);
        let result = score(&task, &UserProgress::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.breakdown, ScoreBreakdown::default());
        assert_eq!(result.task_id.as_str(), "a");
    }

    #[test]
    fn test_full_breakdown_for_fresh_easy_task() {
        let progress = UserProgress::default().with_preferred_difficulty(Difficulty::Easy);
        let result = score(&easy_js("a"), &progress);

        assert_close(result.breakdown.prerequisites, 1.0);
        assert_close(result.breakdown.difficulty, 1.2);
        assert_close(result.breakdown.learning_path, 0.5);
        assert_close(result.breakdown.category_balance, 1.0);
        assert_close(result.breakdown.time_efficiency, 1.0);
        assert_close(result.breakdown.mastery_gap, 1.0);
        // 0.35 + 0.30 + 0.10 + 0.10 + 0.05 + 0.05
        assert_close(result.score, 0.95);
    }

    #[test]
    fn test_prerequisite_factor_is_squared() {
        let progress = UserProgress::default().with_completed(["p1"]);
        let task = easy_js("a").with_prerequisites(["p1", "p2"]);
        assert_close(score(&task, &progress).breakdown.prerequisites, 0.25);

        let unknown = easy_js("b").with_prerequisites(["does-not-exist"]);
        assert_close(score(&unknown, &progress).breakdown.prerequisites, 0.0);
    }

    #[test]
    fn test_difficulty_tiers_and_bonus() {
        let progress = UserProgress::default()
            .with_preferred_difficulty(Difficulty::Medium)
            .with_mastery("JS", 50.0);

        let medium = Task::new("m", "JS", Difficulty::Medium, 30);
        let hard = Task::new("h", "JS", Difficulty::Hard, 30);
        let easy = easy_js("e");

        assert_close(score(&medium, &progress).breakdown.difficulty, 0.9);
        assert_close(score(&hard, &progress).breakdown.difficulty, 0.4);
        assert_close(score(&easy, &progress).breakdown.difficulty, 1.0);
    }

    #[test]
    fn test_hard_task_penalized_in_weak_category() {
        let progress = UserProgress::default().with_mastery("JS", 29.9);
        let hard = Task::new("h", "JS", Difficulty::Hard, 30);
        assert_close(score(&hard, &progress).breakdown.difficulty, 0.1);

        let progress = UserProgress::default().with_mastery("JS", 30.0);
        assert_close(score(&hard, &progress).breakdown.difficulty, 0.4);
    }

    #[test]
    fn test_difficulty_floored_at_zero() {
        let config = ScoringConfig {
            weak_category_penalty: 1.0,
            ..Default::default()
        };
        let scorer = TaskScorer::with_config(config);
        let hard = Task::new("h", "JS", Difficulty::Hard, 30);
        let result = scorer.score(&hard, &UserProgress::default());
        assert_eq!(result.breakdown.difficulty, 0.0);
    }

    #[test]
    fn test_learning_path_factor() {
        let progress = UserProgress::default();
        let early = easy_js("a").with_learning_order(10);
        let late = easy_js("b").with_learning_order(90);
        assert_close(score(&early, &progress).breakdown.learning_path, 0.9);
        assert_close(score(&late, &progress).breakdown.learning_path, 0.1);
        assert!(score(&early, &progress).score > score(&late, &progress).score);
    }

    #[test]
    fn test_category_balance_and_unknown_category() {
        let progress = UserProgress::default().with_mastery("JS", 75.0);
        assert_close(score(&easy_js("a"), &progress).breakdown.category_balance, 0.25);

        let unknown = Task::new("b", "Underwater Basketry", Difficulty::Easy, 30);
        assert_close(score(&unknown, &progress).breakdown.category_balance, 1.0);
    }

    #[test]
    fn test_time_efficiency_bands() {
        let progress = UserProgress::default().with_average_session_time(40.0);
        let fits = Task::new("a", "JS", Difficulty::Easy, 40);
        let stretch = Task::new("b", "JS", Difficulty::Easy, 60);
        let long = Task::new("c", "JS", Difficulty::Easy, 61);

        assert_close(score(&fits, &progress).breakdown.time_efficiency, 1.0);
        assert_close(score(&stretch, &progress).breakdown.time_efficiency, 0.8);
        assert_close(score(&long, &progress).breakdown.time_efficiency, 0.5);
    }

    #[test]
    fn test_mastery_gap_halved_for_hard_beginner_tasks() {
        let hard = Task::new("h", "JS", Difficulty::Hard, 30);
        let medium = Task::new("m", "JS", Difficulty::Medium, 30);

        let beginner = UserProgress::default().with_mastery("JS", 10.0);
        assert_close(score(&hard, &beginner).breakdown.mastery_gap, 0.45);
        assert_close(score(&medium, &beginner).breakdown.mastery_gap, 0.9);

        let intermediate = UserProgress::default().with_mastery("JS", 20.0);
        assert_close(score(&hard, &intermediate).breakdown.mastery_gap, 0.8);
    }

    #[test]
    fn test_custom_weights() {
        let weights = crate::config::ScoringWeights {
            prerequisites: 1.0,
            difficulty: 0.0,
            learning_path: 0.0,
            category_balance: 0.0,
            time_efficiency: 0.0,
            mastery_gap: 0.0,
        };
        let scorer = TaskScorer::with_config(ScoringConfig::new().with_weights(weights));
        let progress = UserProgress::default().with_completed(["p1"]);
        let task = easy_js("a").with_prerequisites(["p1", "p2"]);
        assert_close(scorer.score(&task, &progress).score, 0.25);
    }

    #[test]
    fn test_in_progress_task_is_scored() {
        let task = easy_js("a").with_status(TaskStatus::InProgress);
        assert!(score(&task, &UserProgress::default()).score > 0.0);
    }
}
