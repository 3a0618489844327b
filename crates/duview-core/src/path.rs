//! Path normalization for cache and state lookups.

use std::path::{Component, Path, PathBuf};

use crate::error::ScanError;

/// Normalize a path so equivalent spellings map to the same key.
///
/// The result is absolute and free of `.` and `..` components. Symbolic
/// links are left unresolved: normalization is purely lexical apart from
/// anchoring relative paths at the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve a user-supplied path to the form scan roots are keyed by.
///
/// Symbolic links are resolved when the path exists, so a directory named
/// through a linked root matches the entries listed under that root. Paths
/// that cannot be resolved fall back to [`normalize_path`].
pub fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| normalize_path(path))
}

/// Resolve a user-supplied scan root to a canonical directory path.
pub fn resolve_root(path: &Path) -> Result<PathBuf, ScanError> {
    let root = path.canonicalize().map_err(|e| ScanError::io(path, e))?;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory { path: root });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_dot_components() {
        assert_eq!(
            normalize_path(Path::new("/data/./a/../b/")),
            PathBuf::from("/data/b")
        );
    }

    #[test]
    fn test_parent_of_root_stays_root() {
        assert_eq!(normalize_path(Path::new("/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_relative_and_absolute_collide() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize_path(Path::new("some/dir")), cwd.join("some/dir"));
        assert_eq!(
            normalize_path(Path::new("./some/../some/dir")),
            normalize_path(&cwd.join("some/dir"))
        );
    }

    #[test]
    fn test_resolve_root() {
        let temp = std::env::temp_dir();
        assert!(resolve_root(&temp).unwrap().is_absolute());

        let missing = resolve_root(Path::new("/definitely/not/here"));
        assert!(matches!(missing, Err(ScanError::NotFound { .. })));
    }

    #[test]
    fn test_resolve_path_falls_back_to_lexical() {
        let missing = Path::new("/definitely/not/../not/here");
        assert_eq!(resolve_path(missing), PathBuf::from("/definitely/not/here"));
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_root_and_children_agree() {
        let base = std::env::temp_dir().join(format!("duview-path-{}", std::process::id()));
        let real = base.join("real");
        let link = base.join("link");
        std::fs::create_dir_all(real.join("sub")).unwrap();
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let root = resolve_root(&link).unwrap();
        let sub = resolve_path(&link.join("sub"));
        assert_eq!(sub, root.join("sub"));
        assert_eq!(resolve_path(&real.join("sub")), sub);

        std::fs::remove_dir_all(&base).unwrap();
    }
}
