//! Memoized aggregate sizes.

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use duview_core::{MAX_FILE_SIZE, normalize_path};

/// Thread-safe cache of computed sizes keyed by normalized path.
///
/// Directory totals are the recursive sum of the regular files below them.
/// Symbolic links are never followed and files reporting more than
/// [`MAX_FILE_SIZE`] bytes contribute nothing. Values stay cached until
/// [`invalidate`](Self::invalidate) or [`invalidate_path`](Self::invalidate_path)
/// drops them, so a repeated lookup does not notice changes on disk.
#[derive(Debug)]
pub struct SizeCache {
    sizes: DashMap<PathBuf, u64>,
    size_cap: u64,
}

impl SizeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::with_size_cap(MAX_FILE_SIZE)
    }

    pub(crate) fn with_size_cap(size_cap: u64) -> Self {
        Self {
            sizes: DashMap::new(),
            size_cap,
        }
    }

    /// Look up a cached size without computing anything.
    pub fn get(&self, path: &Path) -> Option<u64> {
        self.sizes.get(&normalize_path(path)).map(|size| *size)
    }

    /// Return the cached size of `path`, computing and caching it on a miss.
    ///
    /// Traversal errors are absorbed: an unreadable subtree counts as zero
    /// and its siblings are still summed.
    pub fn get_or_compute(&self, path: &Path) -> u64 {
        self.lookup(&normalize_path(path))
    }

    /// Drop every cached size.
    pub fn invalidate(&self) {
        self.sizes.clear();
    }

    /// Drop the cached size of `path`, of everything below it and of its
    /// ancestors, whose totals included it.
    pub fn invalidate_path(&self, path: &Path) {
        let path = normalize_path(path);
        self.sizes
            .retain(|cached, _| !cached.starts_with(&path) && !path.starts_with(cached));
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Clamp a reported file size to zero when it exceeds the cap.
    pub(crate) fn capped(&self, size: u64) -> u64 {
        if size > self.size_cap { 0 } else { size }
    }

    /// Cached lookup for an already normalized path.
    fn lookup(&self, path: &Path) -> u64 {
        let cached = self.sizes.get(path).map(|size| *size);
        match cached {
            Some(size) => size,
            None => self.compute(path),
        }
    }

    fn compute(&self, path: &Path) -> u64 {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(err) => {
                debug!(path = %path.display(), %err, "skipping unreadable path");
                return 0;
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_file() {
            let size = self.capped(metadata.len());
            self.sizes.insert(path.to_path_buf(), size);
            size
        } else if file_type.is_dir() {
            self.compute_dir(path)
        } else {
            0
        }
    }

    fn compute_dir(&self, dir: &Path) -> u64 {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                // Left uncached so a later successful read replaces it.
                debug!(path = %dir.display(), %err, "cannot enumerate directory");
                return 0;
            }
        };

        let mut total: u64 = 0;
        let mut subdirs = Vec::new();

        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    debug!(path = %dir.display(), %err, "skipping broken entry");
                    continue;
                }
            };

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    debug!(path = %entry.path().display(), %err, "cannot read file type");
                    continue;
                }
            };

            if file_type.is_dir() {
                subdirs.push(entry.path());
            } else if file_type.is_file() {
                let size = match entry.metadata() {
                    Ok(m) => self.capped(m.len()),
                    Err(err) => {
                        debug!(path = %entry.path().display(), %err, "cannot stat file");
                        continue;
                    }
                };
                self.sizes.insert(entry.path(), size);
                total += size;
            }
        }

        total += subdirs
            .par_iter()
            .map(|subdir| self.lookup(subdir))
            .sum::<u64>();

        self.sizes.insert(dir.to_path_buf(), total);
        total
    }
}

impl Default for SizeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_sums_regular_files() {
        let temp = create_test_tree();
        let cache = SizeCache::new();

        assert_eq!(cache.get_or_compute(temp.path()), 5 + 17 + 4 + 17);
        assert_eq!(cache.get_or_compute(&temp.path().join("dir1")), 21);
    }

    #[test]
    fn test_caches_files_and_subdirectories_on_the_way() {
        let temp = create_test_tree();
        let cache = SizeCache::new();
        cache.get_or_compute(temp.path());

        assert_eq!(cache.get(&temp.path().join("dir1/subdir")), Some(4));
        assert_eq!(cache.get(&temp.path().join("dir2/file4.txt")), Some(17));
        assert_eq!(cache.get(&temp.path().join("missing")), None);
    }

    #[test]
    fn test_equivalent_spellings_share_entry() {
        let temp = create_test_tree();
        let cache = SizeCache::new();
        cache.get_or_compute(&temp.path().join("dir1"));

        let len = cache.len();
        let dotted = temp.path().join("dir2/../dir1/.");
        assert_eq!(cache.get(&dotted), Some(21));
        assert_eq!(cache.get_or_compute(&dotted), 21);
        assert_eq!(cache.len(), len);
    }

    #[test]
    fn test_oversized_files_are_excluded() {
        let temp = create_test_tree();
        let cache = SizeCache::with_size_cap(10);

        // Only file1.txt (5) and file3.txt (4) fit under the cap.
        assert_eq!(cache.get_or_compute(temp.path()), 9);
        assert_eq!(cache.get(&temp.path().join("dir2/file4.txt")), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_over_one_tebibyte_contributes_nothing() {
        let temp = create_test_tree();
        let huge = temp.path().join("dir2/huge.img");
        let file = fs::File::create(&huge).unwrap();
        // Sparse, so no blocks are allocated. Filesystems that cannot
        // represent the length have nothing to check here.
        if file.set_len(MAX_FILE_SIZE + 1).is_err() {
            return;
        }
        drop(file);

        let cache = SizeCache::new();
        assert_eq!(cache.get_or_compute(temp.path()), 5 + 17 + 4 + 17);
        assert_eq!(cache.get(&huge), Some(0));
        assert_eq!(cache.get(&temp.path().join("dir2")), Some(17));
    }

    #[test]
    fn test_invalidate_path_drops_ancestors_and_descendants() {
        let temp = create_test_tree();
        let cache = SizeCache::new();
        cache.get_or_compute(temp.path());

        cache.invalidate_path(&temp.path().join("dir1"));

        assert_eq!(cache.get(temp.path()), None);
        assert_eq!(cache.get(&temp.path().join("dir1")), None);
        assert_eq!(cache.get(&temp.path().join("dir1/subdir")), None);
        assert_eq!(cache.get(&temp.path().join("dir2")), Some(17));
        assert_eq!(cache.get(&temp.path().join("file1.txt")), Some(5));
    }

    #[test]
    fn test_missing_path_is_zero_and_uncached() {
        let temp = TempDir::new().unwrap();
        let cache = SizeCache::new();
        let missing = temp.path().join("nope");

        assert_eq!(cache.get_or_compute(&missing), 0);
        assert!(cache.get(&missing).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let temp = create_test_tree();
        symlink(temp.path().join("dir1"), temp.path().join("dir2/link")).unwrap();
        symlink(temp.path(), temp.path().join("dir1/loop")).unwrap();

        let cache = SizeCache::new();
        assert_eq!(cache.get_or_compute(temp.path()), 43);
        assert_eq!(cache.get_or_compute(&temp.path().join("dir2/link")), 0);
    }
}
