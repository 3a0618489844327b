//! Directories shown with their children inline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use duview_core::normalize_path;

/// Set of expanded directory paths, normalized on every access.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<PathBuf>,
}

impl ExpansionState {
    /// Create an empty expansion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the expansion of `path`. Returns whether it is now expanded.
    pub fn toggle(&mut self, path: &Path) -> bool {
        let path = normalize_path(path);
        if self.expanded.remove(&path) {
            false
        } else {
            self.expanded.insert(path);
            true
        }
    }

    /// Expand a path.
    pub fn expand(&mut self, path: &Path) {
        self.expanded.insert(normalize_path(path));
    }

    /// Collapse a path.
    pub fn collapse(&mut self, path: &Path) {
        self.expanded.remove(&normalize_path(path));
    }

    /// Check if a path is expanded.
    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(&normalize_path(path))
    }

    /// Forget `path` and every expanded directory below it.
    pub fn remove_subtree(&mut self, path: &Path) {
        let path = normalize_path(path);
        self.expanded.retain(|p| !p.starts_with(&path));
    }

    /// Number of expanded directories.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Check if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
