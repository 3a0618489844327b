//! Explorer session: the state one interactive front end owns.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use duview_core::{ExplorerConfig, ScanError, normalize_path};

use crate::cache::SizeCache;
use crate::delete::{DeleteMode, delete_path};
use crate::expansion::ExpansionState;
use crate::orchestrator::{ScanActivity, ScanHandle, ScanOrchestrator, ScanOutcome, run_scan};
use crate::pagination::PaginationState;

/// Size cache, expansion and pagination state for one running session,
/// plus the orchestrator that scans with them.
///
/// Background scans work on snapshots of the expansion and pagination
/// state taken when the scan starts, so toggling or advancing while a
/// scan runs only affects the next scan. The size cache is shared with
/// the worker and is safe to invalidate at any time.
#[derive(Debug)]
pub struct ExplorerSession {
    config: ExplorerConfig,
    cache: Arc<SizeCache>,
    expansion: ExpansionState,
    pagination: PaginationState,
    orchestrator: ScanOrchestrator,
}

impl ExplorerSession {
    /// Create a session with empty state.
    pub fn new(config: ExplorerConfig) -> Self {
        let cache = Arc::new(SizeCache::new());
        let orchestrator =
            ScanOrchestrator::new(Arc::clone(&cache), config.page_size, config.busy_grace);
        Self {
            config,
            cache,
            expansion: ExpansionState::new(),
            pagination: PaginationState::new(),
            orchestrator,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Shared size cache.
    pub fn cache(&self) -> &Arc<SizeCache> {
        &self.cache
    }

    /// Current expansion state.
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Current pagination state.
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// Show or hide the children of `path`. Returns whether it is now expanded.
    pub fn toggle_expansion(&mut self, path: &Path) -> bool {
        self.expansion.toggle(path)
    }

    /// Reveal the next page of `path`'s children. Returns the new page.
    pub fn advance_pagination(&mut self, path: &Path) -> usize {
        self.pagination.advance(path)
    }

    /// Drop every cached size so the next scan reads the disk again.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    /// Drop cached sizes affected by a change at `path`.
    pub fn invalidate_path(&self, path: &Path) {
        self.cache.invalidate_path(path);
    }

    /// Check whether a background scan is running.
    pub fn is_scanning(&self) -> bool {
        self.orchestrator.activity().is_running()
    }

    /// The "still running" flag shared by this session's scans.
    pub fn activity(&self) -> ScanActivity {
        self.orchestrator.activity()
    }

    /// Start a background scan of `root`.
    ///
    /// Fails with [`ScanError::ScanInProgress`] until the previous scan
    /// has finished.
    pub fn trigger_rescan(&self, root: &Path) -> Result<ScanHandle, ScanError> {
        self.orchestrator
            .start(root, self.expansion.clone(), self.pagination.clone())
    }

    /// Build the listing of `root` on the calling thread.
    pub fn scan_now(&self, root: &Path) -> ScanOutcome {
        run_scan(
            &self.cache,
            &normalize_path(root),
            &self.expansion,
            &self.pagination,
            self.config.page_size,
        )
    }

    /// Delete `path` and reconcile session state.
    ///
    /// The cache is invalidated whether or not the deletion succeeded, so
    /// the next scan reflects what is actually on disk. Expansion and
    /// pagination entries under `path` are purged once it is gone.
    pub fn delete(&mut self, path: &Path, mode: DeleteMode) -> Result<(), ScanError> {
        let result = delete_path(path, mode);
        self.invalidate_cache();

        if result.is_ok() {
            self.expansion.remove_subtree(path);
            self.pagination.remove_subtree(path);
        } else {
            debug!(path = %path.display(), "deletion failed, keeping view state");
        }
        result
    }
}

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}
