//! Flattened, paginated listing builder.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use rayon::prelude::*;
use tracing::debug;

use duview_core::{Entry, EntryKind, normalize_path};

use crate::cache::SizeCache;
use crate::expansion::ExpansionState;
use crate::pagination::PaginationState;

/// Builds the depth-ordered entry sequence for a directory.
///
/// Children are sorted by size descending, then name ascending. Only the
/// current page of each directory is emitted; the rest collapses into one
/// [`EntryKind::More`] marker. Expanded directories are followed directly
/// by their own listing, one level deeper.
pub struct TreeBuilder<'a> {
    cache: &'a SizeCache,
    expansion: &'a ExpansionState,
    pagination: &'a PaginationState,
    page_size: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over the given session state.
    pub fn new(
        cache: &'a SizeCache,
        expansion: &'a ExpansionState,
        pagination: &'a PaginationState,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            cache,
            expansion,
            pagination,
            page_size: page_size.get(),
        }
    }

    /// Build the listing of `root`, with its children at `depth`.
    pub fn build(&self, root: &Path, depth: u32) -> Vec<Entry> {
        let mut entries = Vec::new();
        self.emit(&normalize_path(root), depth, &mut entries);
        entries
    }

    fn emit(&self, dir: &Path, depth: u32, out: &mut Vec<Entry>) {
        let children = self.sorted_children(dir);
        let total = children.len();

        let page = self.pagination.page_of(dir);
        let start = page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);

        let mut remaining = children.into_iter().skip(start);
        for child in remaining.by_ref().take(end - start) {
            let expanded =
                child.kind == EntryKind::Directory && self.expansion.is_expanded(&child.path);
            let path = child.path.clone();
            out.push(child.into_entry(depth, expanded));
            if expanded {
                self.emit(&path, depth + 1, out);
            }
        }

        let hidden: Vec<Child> = remaining.collect();
        if !hidden.is_empty() {
            let size = hidden.iter().map(|c| c.size).sum();
            out.push(Entry::more(dir, depth, hidden.len(), size));
        }
    }

    /// Enumerate, size and sort the direct children of `dir`.
    fn sorted_children(&self, dir: &Path) -> Vec<Child> {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                debug!(path = %dir.display(), %err, "cannot list directory");
                return Vec::new();
            }
        };

        let mut children: Vec<Child> = read_dir
            .filter_map(|entry_result| match entry_result {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(path = %dir.display(), %err, "skipping broken entry");
                    None
                }
            })
            .map(|entry| {
                let path = entry.path();
                let name = CompactString::new(entry.file_name().to_string_lossy());
                let (kind, size) = match entry.file_type() {
                    Ok(t) if t.is_dir() => (EntryKind::Directory, 0),
                    Ok(t) if t.is_file() => {
                        let size = entry
                            .metadata()
                            .map(|m| self.cache.capped(m.len()))
                            .unwrap_or(0);
                        (EntryKind::File, size)
                    }
                    _ => (EntryKind::Other, 0),
                };
                Child {
                    kind,
                    name,
                    path,
                    size,
                }
            })
            .collect();

        children
            .par_iter_mut()
            .filter(|c| c.kind == EntryKind::Directory)
            .for_each(|c| c.size = self.cache.get_or_compute(&c.path));

        children.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
        children
    }
}

/// A sized child awaiting placement in the listing.
struct Child {
    kind: EntryKind,
    name: CompactString,
    path: PathBuf,
    size: u64,
}

impl Child {
    fn into_entry(self, depth: u32, expanded: bool) -> Entry {
        Entry {
            kind: self.kind,
            name: self.name,
            path: self.path,
            size: self.size,
            depth,
            expanded,
        }
    }
}
