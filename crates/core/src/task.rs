//! Task model - a single unit of study.

use serde::{Deserialize, Serialize};
use crate::id::TaskId;
use crate::Time;

/// A study task, as materialized from the document store.
///
/// The ranking engine only reads tasks; it never changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Current status
    pub status: TaskStatus,

    /// Free-form category label (e.g. "JavaScript", "System Design")
    pub category: String,

    /// Difficulty tier
    pub difficulty: Difficulty,

    /// Estimated time to finish, in minutes
    pub estimated_time: u32,

    /// Tasks that should be completed first.
    ///
    /// Ids that match no known task are allowed and never count as satisfied.
    #[serde(default)]
    pub prerequisites: Vec<TaskId>,

    /// Curriculum position hint (lower = earlier)
    #[serde(default)]
    pub learning_order: Option<u32>,

    /// Recorded study time, if any
    #[serde(default)]
    pub time_tracking: Option<TimeTracking>,
}

impl Task {
    /// Create a todo task with no prerequisites.
    pub fn new(
        id: impl Into<TaskId>,
        category: impl Into<String>,
        difficulty: Difficulty,
        estimated_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            status: TaskStatus::Todo,
            category: category.into(),
            difficulty,
            estimated_time,
            prerequisites: Vec::new(),
            learning_order: None,
            time_tracking: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the prerequisite ids.
    pub fn with_prerequisites<I, T>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Set the learning order hint.
    pub fn with_learning_order(mut self, order: u32) -> Self {
        self.learning_order = Some(order);
        self
    }

    /// Attach recorded study time.
    pub fn with_time_tracking(mut self, tracking: TimeTracking) -> Self {
        self.time_tracking = Some(tracking);
        self
    }

    /// Whether the task is finished.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Minutes recorded against this task, when tracking exists and is non-zero.
    pub fn recorded_minutes(&self) -> Option<f64> {
        self.time_tracking
            .as_ref()
            .map(|t| t.total_time)
            .filter(|m| m.is_finite() && *m > 0.0)
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Completed
    Done,
}

impl TaskStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy
    Easy,
    /// Medium
    Medium,
    /// Hard
    Hard,
}

impl Difficulty {
    /// Wire name of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time recorded while studying a task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    /// Total minutes spent across all sessions
    pub total_time: f64,

    /// Number of recorded sessions
    #[serde(default)]
    pub sessions: u32,

    /// When the last session ended
    #[serde(default)]
    pub last_session_at: Option<Time>,
}

impl TimeTracking {
    /// Tracking with a total and no session detail.
    pub fn minutes(total_time: f64) -> Self {
        Self {
            total_time,
            ..Default::default()
        }
    }
}

/// Filter for querying tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Filter by status
    pub status: Option<Vec<TaskStatus>>,

    /// Filter by category
    pub category: Option<String>,
}

impl TaskFilter {
    /// Whether a task passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(statuses) = &self.status {
            if !statuses.contains(&task.status) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &task.category != category {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_from_document() {
        let json = r#"{
            "id": "js-closures",
            "title": "Closures",
            "status": "in-progress",
            "category": "JavaScript",
            "difficulty": "medium",
            "estimatedTime": 30,
            "prerequisites": ["js-scope"],
            "learningOrder": 4,
            "timeTracking": { "totalTime": 25.5, "sessions": 2 }
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "js-closures");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.difficulty, Difficulty::Medium);
        assert_eq!(task.estimated_time, 30);
        assert_eq!(task.prerequisites, vec![TaskId::from("js-scope")]);
        assert_eq!(task.learning_order, Some(4));
        assert_eq!(task.recorded_minutes(), Some(25.5));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": "a",
            "status": "todo",
            "category": "Algorithms",
            "difficulty": "hard",
            "estimatedTime": 60
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.prerequisites.is_empty());
        assert!(task.learning_order.is_none());
        assert!(task.recorded_minutes().is_none());
    }

    #[test]
    fn test_filter_matches() {
        let task = Task::new("a", "React", Difficulty::Easy, 10).with_status(TaskStatus::Done);

        assert!(TaskFilter::default().matches(&task));

        let done = TaskFilter {
            status: Some(vec![TaskStatus::Done]),
            ..Default::default()
        };
        assert!(done.matches(&task));

        let todo_react = TaskFilter {
            status: Some(vec![TaskStatus::Todo]),
            category: Some("React".to_string()),
        };
        assert!(!todo_react.matches(&task));
    }

    #[test]
    fn test_zero_tracking_is_not_recorded() {
        let task = Task::new("a", "JS", Difficulty::Easy, 10)
            .with_time_tracking(TimeTracking::minutes(0.0));
        assert!(task.recorded_minutes().is_none());
    }
}
