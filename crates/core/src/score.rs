//! Derived priority scores.

use serde::Serialize;
use crate::id::TaskId;

/// Priority of one task, with the factor values that produced it.
///
/// Scores are derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskScore {
    /// The scored task
    pub task_id: TaskId,

    /// Weighted total. Only relative order is meaningful.
    pub score: f64,

    /// Unweighted factor values
    pub breakdown: ScoreBreakdown,
}

impl TaskScore {
    /// A zero score with all factors zero.
    pub fn zero(task_id: TaskId) -> Self {
        Self {
            task_id,
            score: 0.0,
            breakdown: ScoreBreakdown::default(),
        }
    }
}

/// The six factor values of a [`TaskScore`], before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Squared prerequisite satisfaction
    pub prerequisites: f64,
    /// Difficulty fit (may exceed 1 with the preference bonus)
    pub difficulty: f64,
    /// Curriculum position
    pub learning_path: f64,
    /// Under-mastered category bonus
    pub category_balance: f64,
    /// Fit within one study session
    pub time_efficiency: f64,
    /// Remaining mastery to gain
    pub mastery_gap: f64,
}

impl ScoreBreakdown {
    /// Factor names paired with values, in weight order.
    pub fn factors(&self) -> [(&'static str, f64); 6] {
        [
            ("prerequisites", self.prerequisites),
            ("difficulty", self.difficulty),
            ("learning_path", self.learning_path),
            ("category_balance", self.category_balance),
            ("time_efficiency", self.time_efficiency),
            ("mastery_gap", self.mastery_gap),
        ]
    }
}
