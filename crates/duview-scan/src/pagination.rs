//! Per-directory page cursors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use duview_core::normalize_path;

/// Page index of every directory whose listing was advanced.
///
/// Pages only move forward. Collapsing and re-expanding a directory keeps
/// its page; the cursor is dropped only when the directory itself is deleted.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    pages: HashMap<PathBuf, usize>,
}

impl PaginationState {
    /// Create an empty pagination state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page of `path`, 0 if never advanced.
    pub fn page_of(&self, path: &Path) -> usize {
        self.pages.get(&normalize_path(path)).copied().unwrap_or(0)
    }

    /// Reveal the next page of `path`. Returns the new page index.
    pub fn advance(&mut self, path: &Path) -> usize {
        let page = self.pages.entry(normalize_path(path)).or_insert(0);
        *page += 1;
        *page
    }

    /// Forget the cursors of `path` and every directory below it.
    pub fn remove_subtree(&mut self, path: &Path) {
        let path = normalize_path(path);
        self.pages.retain(|p, _| !p.starts_with(&path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_zero() {
        let state = PaginationState::new();
        assert_eq!(state.page_of(Path::new("/data")), 0);
    }

    #[test]
    fn test_advance() {
        let mut state = PaginationState::new();
        assert_eq!(state.advance(Path::new("/data")), 1);
        assert_eq!(state.advance(Path::new("/data/.")), 2);
        assert_eq!(state.page_of(Path::new("/data")), 2);
        assert_eq!(state.page_of(Path::new("/data/sub")), 0);
    }

    #[test]
    fn test_remove_subtree() {
        let mut state = PaginationState::new();
        state.advance(Path::new("/data"));
        state.advance(Path::new("/data/logs"));
        state.advance(Path::new("/data/logs/2024"));

        state.remove_subtree(Path::new("/data/logs"));

        assert_eq!(state.page_of(Path::new("/data")), 1);
        assert_eq!(state.page_of(Path::new("/data/logs")), 0);
        assert_eq!(state.page_of(Path::new("/data/logs/2024")), 0);
    }
}
