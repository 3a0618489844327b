//! Scanning engine for duview.
//!
//! This crate computes directory sizes, builds the flattened listing the
//! front end renders and runs that build in the background.
//!
//! # Overview
//!
//! - [`SizeCache`] memoizes aggregate sizes per normalized path, summing
//!   subdirectories in parallel via rayon
//! - [`ExpansionState`] and [`PaginationState`] record which directories
//!   are open and which page of each one is visible
//! - [`TreeBuilder`] turns those into a depth-ordered [`Entry`] sequence,
//!   sorted by size with oversized directories paged
//! - [`ScanOrchestrator`] runs a build on tokio's blocking pool and reports
//!   whether it is still running after a grace period
//! - [`ExplorerSession`] owns all of the above for one front end
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use duview_scan::{ExplorerSession, ScanPoll};
//!
//! # async fn demo() -> Result<(), duview_scan::ScanError> {
//! let mut session = ExplorerSession::default();
//! session.toggle_expansion(Path::new("/var/log"));
//!
//! let outcome = match session.trigger_rescan(Path::new("/var"))?.wait_grace().await? {
//!     ScanPoll::Complete(outcome) => outcome,
//!     ScanPoll::StillRunning(handle) => {
//!         // Show a busy indicator while waiting.
//!         handle.wait().await?
//!     }
//! };
//!
//! for entry in &outcome.entries {
//!     println!("{}{} {}", "  ".repeat(entry.depth as usize), entry.name, entry.size);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod cache;
mod delete;
mod expansion;
mod orchestrator;
mod pagination;
mod session;

pub use builder::TreeBuilder;
pub use cache::SizeCache;
pub use delete::{DeleteMode, delete_path};
pub use expansion::ExpansionState;
pub use orchestrator::{ScanActivity, ScanHandle, ScanOrchestrator, ScanOutcome, ScanPoll};
pub use pagination::PaginationState;
pub use session::ExplorerSession;

// Re-export core types for convenience
pub use duview_core::{
    BUSY_TICK, Entry, EntryKind, ExplorerConfig, MAX_FILE_SIZE, ScanError, format_elapsed,
    format_size, normalize_path, resolve_path, resolve_root,
};
