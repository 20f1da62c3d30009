//! Output formatters for run results.
//!
//! - [`json`]: one JSON object per event, for automation and scripting
//! - [`text`]: a short colored summary for humans
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::output::render_summary;
//! use dirdedup::report::LogSink;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use std::path::Path;
//!
//! let stats = TreeWalker::new(Path::new("."), WalkerConfig::default())
//!     .run(&LogSink)
//!     .unwrap();
//! print!("{}", render_summary(&stats, true));
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::JsonLinesSink;
pub use text::render_summary;
