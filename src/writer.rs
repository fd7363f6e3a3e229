//! Crash-safe document emission: back up, write, restore on failure.
//!
//! The destination is renamed to `<path>.bak` before the new content is
//! written, and the backup is copied back (never deleted) if the write
//! fails. Rename-then-write is not an atomic replace; it is acceptable here
//! because backup and destination share a volume and the tool is the only
//! writer.

use crate::error::{ConvertError, RestoreOutcome};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write one document, preserving any existing file at `path` as
/// `<path>.bak`.
pub fn write_document(path: &Path, content: &str) -> Result<(), ConvertError> {
    write_with(path, content, |path, content| fs::write(path, content))
}

fn write_with<F>(path: &Path, content: &str, write: F) -> Result<(), ConvertError>
where
    F: FnOnce(&Path, &str) -> io::Result<()>,
{
    let backup = backup_path(path);
    let backed_up = if path.is_file() {
        fs::rename(path, &backup).map_err(|source| ConvertError::Backup {
            path: path.to_path_buf(),
            source,
        })?;
        true
    } else {
        false
    };

    if let Err(source) = write(path, content) {
        let restore = if backed_up {
            // Copy rather than rename: the backup must survive even when the
            // restore succeeds.
            match fs::copy(&backup, path) {
                Ok(_) => RestoreOutcome::Restored,
                Err(restore_err) => {
                    tracing::warn!(
                        backup = ?backup,
                        error = %restore_err,
                        "restore after failed write did not succeed"
                    );
                    RestoreOutcome::BackupLeftBehind
                }
            }
        } else {
            RestoreOutcome::NothingToRestore
        };
        return Err(ConvertError::Write {
            path: path.to_path_buf(),
            restore,
            source,
        });
    }

    tracing::info!(path = ?path, "document written");
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".bak");
    PathBuf::from(raw)
}
