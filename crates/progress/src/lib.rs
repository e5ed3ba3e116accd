//! Progress snapshots
//!
//! Derives the user's mastery, completed set, session length, and preferred
//! difficulty from the task collection.

#![warn(missing_docs)]

pub mod builder;
pub mod config;

pub use builder::{ProgressBuilder, build_progress};
pub use config::{ProgressConfig, DEFAULT_CATEGORIES};
