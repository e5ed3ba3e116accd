//! studypath core data models.
//!
//! This crate defines the task, progress, and score types shared by the
//! progress builder and the ranking engine.

#![warn(missing_docs)]

// Core identities
mod id;

// Tasks and progress
mod task;
mod progress;

// Ranking output
mod score;

// Re-exports
pub use id::TaskId;
pub use task::{Task, TaskStatus, Difficulty, TimeTracking, TaskFilter};
pub use progress::{UserProgress, CategoryMastery, DEFAULT_SESSION_MINUTES};
pub use score::{TaskScore, ScoreBreakdown};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
