//! Atomic replacement of the target file.

use crate::error::{Operation, Result, SpliceError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `file_path` with `content` via temp file + fsync + rename.
///
/// The temp file lives next to the target so the rename never crosses a
/// filesystem. On any failure the temp file is dropped (and deleted) and the
/// target keeps its previous bytes.
pub(crate) fn write_atomic(file_path: &Path, content: &[u8]) -> Result<()> {
    let write_err = |e: std::io::Error| SpliceError::io(file_path, Operation::Write, e);

    let metadata = fs::metadata(file_path).map_err(write_err)?;
    if metadata.permissions().readonly() {
        return Err(SpliceError::PermissionDenied {
            path: file_path.to_path_buf(),
            operation: Operation::Write,
        });
    }

    // Write through symlinks instead of replacing them.
    let real_path = fs::canonicalize(file_path).map_err(write_err)?;
    let dir = real_path
        .parent()
        .ok_or_else(|| SpliceError::Other(format!("{} has no parent directory", file_path.display())))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(content).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_err)?;
    temp.persist(&real_path).map_err(|e| write_err(e.error))?;

    log::debug!("Replaced {} ({} bytes)", real_path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("target.txt");
        fs::write(&path, "old\n").expect("Failed to write file");

        write_atomic(&path, b"new\n").expect("Atomic write failed");

        assert_eq!(fs::read_to_string(&path).expect("read"), "new\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(leftovers.len(), 1, "Temp file should not be left behind");
    }

    #[test]
    fn test_write_atomic_rejects_readonly_target() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("locked.txt");
        fs::write(&path, "keep\n").expect("Failed to write file");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).expect("set_permissions");

        let result = write_atomic(&path, b"overwrite\n");

        assert!(matches!(
            result,
            Err(SpliceError::PermissionDenied {
                operation: Operation::Write,
                ..
            })
        ));
        assert_eq!(fs::read_to_string(&path).expect("read"), "keep\n");
    }

    #[test]
    fn test_write_atomic_missing_target_is_write_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("gone.txt");

        let result = write_atomic(&path, b"x");

        assert!(matches!(
            result,
            Err(SpliceError::Io {
                operation: Operation::Write,
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_follows_symlink() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&real, "a\n").expect("write");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        write_atomic(&link, b"b\n").expect("Atomic write failed");

        assert!(fs::symlink_metadata(&link).expect("meta").file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).expect("read"), "b\n");
    }
}
