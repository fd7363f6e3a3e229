use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What happened to the pre-existing file after a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The original content was copied back from the backup.
    Restored,
    /// The original content survives only at the `.bak` path.
    BackupLeftBehind,
    /// There was no pre-existing file, so nothing needed restoring.
    NothingToRestore,
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreOutcome::Restored => write!(f, "original restored from backup"),
            RestoreOutcome::BackupLeftBehind => {
                write!(f, "data loss: backup left at the .bak path")
            }
            RestoreOutcome::NothingToRestore => write!(f, "no previous file to restore"),
        }
    }
}

/// Fatal conversion errors. Recoverable conditions (dropped relationship
/// endpoints, omitted values, out-of-range dates) are handled locally and
/// never surface here.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read project file {path:?}: {detail}")]
    Container { path: PathBuf, detail: String },

    #[error("project file is missing the required '{section}' section")]
    MalformedProject { section: &'static str },

    #[error("entity {id}: {detail}")]
    MalformedEntity { id: String, detail: String },

    #[error("event {id}: {detail}")]
    MalformedEvent { id: String, detail: String },

    #[error("no date range property with an 'AD' era found in the project template")]
    NoCalendar,

    #[error("cannot back up {path:?} before overwrite: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path:?} ({restore}): {source}")]
    Write {
        path: PathBuf,
        restore: RestoreOutcome,
        #[source]
        source: std::io::Error,
    },
}
