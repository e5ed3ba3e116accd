//! Task source trait abstraction.

use async_trait::async_trait;
use studypath_core::{Task, TaskFilter, TaskId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading tasks.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A task document could not be parsed
    #[error("Invalid task document {path}: {source}")]
    InvalidDocument {
        /// File the document came from
        path: std::path::PathBuf,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Read-only view of the task document store.
///
/// The ranking engine consumes a materialized collection; writes belong to
/// whoever owns the store.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Load a task by ID.
    async fn load_task(&self, id: &TaskId) -> Result<Option<Task>>;

    /// List tasks matching the filter, in a stable order.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// List every task.
    async fn all_tasks(&self) -> Result<Vec<Task>> {
        self.list_tasks(&TaskFilter::default()).await
    }
}
