//! Background scan execution.
//!
//! Each scan runs one [`TreeBuilder`] pass on tokio's blocking pool so the
//! interactive side stays responsive. Callers get a [`ScanHandle`] that can
//! be awaited directly, or awaited for the busy grace period first to learn
//! whether a busy indicator is warranted.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use duview_core::{Entry, ScanError, normalize_path};

use crate::builder::TreeBuilder;
use crate::cache::SizeCache;
use crate::expansion::ExpansionState;
use crate::pagination::PaginationState;

/// Result of one completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Normalized root that was listed.
    pub root: PathBuf,
    /// Flattened listing of the root's children.
    pub entries: Vec<Entry>,
    /// Aggregate size of the root itself.
    pub total_size: u64,
    /// Wall-clock duration of the build.
    pub elapsed: Duration,
}

/// Shared "a scan is running" flag.
///
/// Clones observe the same flag, so a busy-indicator task can poll it
/// while the interactive side awaits the result.
#[derive(Debug, Clone, Default)]
pub struct ScanActivity {
    running: Arc<AtomicBool>,
}

impl ScanActivity {
    /// Create an idle activity flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a scan is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Poll the flag every `interval` until the scan finishes.
    ///
    /// `on_tick` receives a frame counter starting at 0, for spinner
    /// animation. Returns the number of ticks observed.
    pub async fn wait_idle(&self, interval: Duration, mut on_tick: impl FnMut(u64)) -> u64 {
        let mut ticker = tokio::time::interval(interval);
        let mut frame = 0;
        while self.is_running() {
            ticker.tick().await;
            if !self.is_running() {
                break;
            }
            on_tick(frame);
            frame += 1;
        }
        frame
    }

    /// Mark a scan as started. Returns false if one is already running.
    fn try_begin(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Clears the activity flag when the worker ends, even by unwinding.
struct ActivityGuard(ScanActivity);

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// State of a scan after the busy grace period.
#[derive(Debug)]
pub enum ScanPoll {
    /// The scan finished within the grace period.
    Complete(ScanOutcome),
    /// The scan is still running; show a busy indicator and keep waiting.
    StillRunning(ScanHandle),
}

/// Handle to one in-flight scan.
#[derive(Debug)]
pub struct ScanHandle {
    task: JoinHandle<ScanOutcome>,
    activity: ScanActivity,
    grace: Duration,
}

impl ScanHandle {
    /// Check whether the scan has completed, without waiting.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// The "still running" flag of this scan.
    pub fn activity(&self) -> ScanActivity {
        self.activity.clone()
    }

    /// Wait at most the busy grace period for the result.
    pub async fn wait_grace(mut self) -> Result<ScanPoll, ScanError> {
        let waited = tokio::time::timeout(self.grace, &mut self.task).await;
        match waited {
            Ok(joined) => joined_outcome(joined).map(ScanPoll::Complete),
            Err(_) => Ok(ScanPoll::StillRunning(self)),
        }
    }

    /// Wait for the scan to complete.
    pub async fn wait(self) -> Result<ScanOutcome, ScanError> {
        joined_outcome(self.task.await)
    }
}

/// Unwrap the worker's result. Panics inside the build are re-raised on
/// the waiting side; the only error is a runtime shutting down under it.
fn joined_outcome(joined: Result<ScanOutcome, JoinError>) -> Result<ScanOutcome, ScanError> {
    match joined {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => Err(ScanError::Interrupted),
    }
}

/// Launches at most one background scan at a time.
#[derive(Debug)]
pub struct ScanOrchestrator {
    cache: Arc<SizeCache>,
    page_size: NonZeroUsize,
    grace: Duration,
    activity: ScanActivity,
}

impl ScanOrchestrator {
    /// Create an orchestrator building pages of `page_size` entries.
    pub fn new(cache: Arc<SizeCache>, page_size: NonZeroUsize, grace: Duration) -> Self {
        Self {
            cache,
            page_size,
            grace,
            activity: ScanActivity::new(),
        }
    }

    /// The flag shared by every scan of this orchestrator.
    pub fn activity(&self) -> ScanActivity {
        self.activity.clone()
    }

    /// Start scanning `root` with the given state snapshots.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`ScanError::ScanInProgress`] while a previous scan is running.
    pub fn start(
        &self,
        root: &Path,
        expansion: ExpansionState,
        pagination: PaginationState,
    ) -> Result<ScanHandle, ScanError> {
        let root = normalize_path(root);

        if !self.activity.try_begin() {
            warn!(root = %root.display(), "rejected rescan while a scan is in flight");
            return Err(ScanError::ScanInProgress { root });
        }

        debug!(root = %root.display(), "starting scan");

        let guard = ActivityGuard(self.activity.clone());
        let cache = Arc::clone(&self.cache);
        let page_size = self.page_size;

        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let outcome = run_scan(&cache, &root, &expansion, &pagination, page_size);
            info!(
                root = %outcome.root.display(),
                entries = outcome.entries.len(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "scan complete"
            );
            outcome
        });

        Ok(ScanHandle {
            task,
            activity: self.activity.clone(),
            grace: self.grace,
        })
    }
}

/// Build the listing of `root` and time it.
pub(crate) fn run_scan(
    cache: &SizeCache,
    root: &Path,
    expansion: &ExpansionState,
    pagination: &PaginationState,
    page_size: NonZeroUsize,
) -> ScanOutcome {
    let start = Instant::now();
    let entries = TreeBuilder::new(cache, expansion, pagination, page_size).build(root, 0);
    let elapsed = start.elapsed();

    ScanOutcome {
        root: root.to_path_buf(),
        entries,
        total_size: cache.get_or_compute(root),
        elapsed,
    }
}
