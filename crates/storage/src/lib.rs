//! Task source abstraction and implementations for studypath.
//!
//! This crate provides a read-only, trait-based view of the task document
//! store with a JSON file reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{TaskSource, StorageError, Result};
pub use json_storage::JsonTaskSource;
