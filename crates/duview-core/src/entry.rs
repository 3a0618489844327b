//! Rows of the flattened, depth-ordered listing.

use std::path::PathBuf;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory; its size is the recursive sum of regular files below it.
    #[strum(to_string = "DIR")]
    Directory,
    /// Regular file.
    #[strum(to_string = "FILE")]
    File,
    /// Anything else: sockets, devices, fifos and symbolic links.
    #[strum(to_string = "OTHER")]
    Other,
    /// Synthetic row standing in for children beyond the current page.
    #[strum(to_string = "MORE")]
    More {
        /// Number of children hidden behind this marker.
        hidden: usize,
    },
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    /// Check if this is a pagination marker.
    pub fn is_more(&self) -> bool {
        matches!(self, EntryKind::More { .. })
    }
}

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry kind.
    pub kind: EntryKind,

    /// Base name, or a synthetic label for markers.
    pub name: CompactString,

    /// Normalized absolute path. Markers carry their parent directory's path.
    pub path: PathBuf,

    /// Size in bytes (aggregate for directories and markers).
    pub size: u64,

    /// Indentation level; children of the scan root are at depth 0.
    pub depth: u32,

    /// Whether a directory row currently shows its children inline.
    pub expanded: bool,
}

impl Entry {
    /// Create a directory entry.
    pub fn directory(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        size: u64,
        depth: u32,
        expanded: bool,
    ) -> Self {
        Self {
            kind: EntryKind::Directory,
            name: name.into(),
            path: path.into(),
            size,
            depth,
            expanded,
        }
    }

    /// Create a regular file entry.
    pub fn file(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        size: u64,
        depth: u32,
    ) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.into(),
            path: path.into(),
            size,
            depth,
            expanded: false,
        }
    }

    /// Create an entry for a non-regular, non-directory node.
    pub fn other(name: impl Into<CompactString>, path: impl Into<PathBuf>, depth: u32) -> Self {
        Self {
            kind: EntryKind::Other,
            name: name.into(),
            path: path.into(),
            size: 0,
            depth,
            expanded: false,
        }
    }

    /// Create the marker for `hidden` children of `parent` totalling `size` bytes.
    pub fn more(parent: impl Into<PathBuf>, depth: u32, hidden: usize, size: u64) -> Self {
        Self {
            kind: EntryKind::More { hidden },
            name: format_compact!("… {hidden} more"),
            path: parent.into(),
            size,
            depth,
            expanded: false,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Number of children hidden behind a marker, zero for real entries.
    pub fn hidden_count(&self) -> usize {
        match self.kind {
            EntryKind::More { hidden } => hidden,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(EntryKind::Directory.to_string(), "DIR");
        assert_eq!(EntryKind::File.to_string(), "FILE");
        assert_eq!(EntryKind::Other.to_string(), "OTHER");
        assert_eq!(EntryKind::More { hidden: 3 }.to_string(), "MORE");
    }

    #[test]
    fn test_more_marker() {
        let marker = Entry::more("/data", 2, 150, 11325);
        assert!(marker.kind.is_more());
        assert_eq!(marker.hidden_count(), 150);
        assert_eq!(marker.name.as_str(), "… 150 more");
        assert_eq!(marker.path, PathBuf::from("/data"));
        assert_eq!(marker.depth, 2);
        assert!(!marker.expanded);
    }

    #[test]
    fn test_real_entries_hide_nothing() {
        let file = Entry::file("a.txt", "/data/a.txt", 10, 0);
        assert!(file.kind.is_file());
        assert_eq!(file.hidden_count(), 0);

        let other = Entry::other("sock", "/data/sock", 0);
        assert_eq!(other.size, 0);
        assert!(!other.is_dir());
    }
}
