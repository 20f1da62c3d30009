//! File actions module.
//!
//! Confirmed duplicates are removed through the [`FileRemover`] trait:
//! - [`DeleteMode::Permanent`] unlinks the file
//! - [`DeleteMode::DryRun`] leaves it in place and only reports its size
//!
//! ```no_run
//! use dirdedup::actions::{DeleteMode, FileRemover};
//! use std::path::Path;
//!
//! let result = DeleteMode::DryRun.remove(Path::new("notes copy.txt"));
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{permanent_delete, DeleteError, DeleteMode, DeleteResult, FileRemover};
