//! JSON file task source.
//!
//! Reads task documents exported from the document store. The path may be
//! either a single file holding a JSON array of tasks, or a directory where
//! every `*.json` file holds one task. Directory entries are read in file
//! name order so listings are deterministic.

use std::path::{Path, PathBuf};
use studypath_core::{Task, TaskFilter, TaskId};
use tokio::fs;
use tracing::debug;
use super::{Result, StorageError, TaskSource};

/// File-based JSON task source.
#[derive(Debug, Clone)]
pub struct JsonTaskSource {
    root: PathBuf,
}

impl JsonTaskSource {
    /// Open a source. Fails if the path does not exist.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if fs::metadata(&root).await.is_err() {
            return Err(StorageError::NotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Path this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_all(&self) -> Result<Vec<Task>> {
        let tasks = if fs::metadata(&self.root).await?.is_dir() {
            list_dir(&self.root).await?
        } else {
            read_array(&self.root).await?
        };
        debug!("Loaded {} tasks from {}", tasks.len(), self.root.display());
        Ok(tasks)
    }
}

#[async_trait::async_trait]
impl TaskSource for JsonTaskSource {
    async fn load_task(&self, id: &TaskId) -> Result<Option<Task>> {
        Ok(self.read_all().await?.into_iter().find(|t| &t.id == id))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect())
    }
}

async fn read_array(path: &Path) -> Result<Vec<Task>> {
    let json = fs::read_to_string(path).await?;
    serde_json::from_str(&json).map_err(|source| StorageError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_one(path: &Path) -> Result<Task> {
    let json = fs::read_to_string(path).await?;
    serde_json::from_str(&json).map_err(|source| StorageError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

async fn list_dir(dir: &Path) -> Result<Vec<Task>> {
    let mut paths = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        items.push(read_one(&path).await?);
    }
    Ok(items)
}
