//! Core types for duview.
//!
//! This crate provides the data structures shared by the scanning engine
//! and its front ends: flattened listing entries, explorer configuration,
//! error types and the path normalization every lookup goes through.

mod config;
mod entry;
mod error;
mod format;
mod path;

pub use config::{BUSY_TICK, ExplorerConfig, ExplorerConfigBuilder, MAX_FILE_SIZE};
pub use entry::{Entry, EntryKind};
pub use error::ScanError;
pub use format::{format_elapsed, format_size};
pub use path::{normalize_path, resolve_path, resolve_root};
