//! Removal of listed entries.

use std::fs;
use std::path::Path;

use tracing::info;

use duview_core::ScanError;

/// How a path is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Move to the system trash.
    #[default]
    Trash,
    /// Remove from disk immediately.
    Permanent,
}

/// Delete a file or directory tree.
///
/// Symbolic links are removed themselves, never their targets.
pub fn delete_path(path: &Path, mode: DeleteMode) -> Result<(), ScanError> {
    match mode {
        DeleteMode::Trash => trash::delete(path)
            .map_err(|e| ScanError::delete_failed(path, std::io::Error::other(e.to_string())))?,
        DeleteMode::Permanent => {
            let metadata =
                fs::symlink_metadata(path).map_err(|e| ScanError::delete_failed(path, e))?;
            let removed = if metadata.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            removed.map_err(|e| ScanError::delete_failed(path, e))?;
        }
    }

    info!(path = %path.display(), ?mode, "deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_permanent_delete_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("build");
        fs::create_dir_all(dir.join("cache")).unwrap();
        fs::write(dir.join("cache/blob"), "data").unwrap();

        delete_path(&dir, DeleteMode::Permanent).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_permanent_delete_missing_fails() {
        let temp = TempDir::new().unwrap();
        let err = delete_path(&temp.path().join("nothing"), DeleteMode::Permanent).unwrap_err();
        assert!(matches!(err, ScanError::DeleteFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_permanent_delete_symlink_keeps_target() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "keep").unwrap();
        let link = temp.path().join("link");
        symlink(&target, &link).unwrap();

        delete_path(&link, DeleteMode::Permanent).unwrap();
        assert!(!link.exists());
        assert!(target.join("keep").exists());
    }
}
