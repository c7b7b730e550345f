use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single remote file did not end up on disk.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create data directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download failed: {message}")]
    RemoteFetch {
        /// HTTP status when the source answered with one.
        status: Option<u16>,
        message: String,
    },

    #[error("file write failed for {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download did not finish before the deadline")]
    Timeout,
}

/// Why a staged script did not load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to execute {path:?}: {source}")]
    Exec {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to commit {path:?}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The script is committed; only removing the staged file failed.
    #[error("loaded {path:?} but could not delete it: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("loading {path:?} did not finish before the deadline")]
    Timeout { path: PathBuf },

    #[error("load task failed: {0}")]
    Task(String),
}

impl LoadError {
    /// Whether the script's rows are durably in the database despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, LoadError::Cleanup { .. })
    }
}

/// A fetch failure tagged with the repository path it belongs to.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: FetchError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to process {}: {}", self.path, self.error)
    }
}

/// Outcome of a sync workflow that did not fully succeed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// One or more downloads failed; nothing was loaded.
    #[error("completed with {} errors: {}", .failures.len(), join(.failures))]
    Fetch { failures: Vec<FileFailure> },

    /// A load failed; scripts before `file` are committed, none after it ran.
    #[error("failed to populate {file}: {source}")]
    Load {
        file: String,
        #[source]
        source: LoadError,
    },

    /// Every script is committed but some staged files are still on disk.
    #[error("data loaded but cleanup failed: {}", join(.failures))]
    Cleanup { failures: Vec<LoadError> },
}

impl SyncError {
    /// Short message for the `error` field of an HTTP error body.
    pub fn summary(&self) -> String {
        match self {
            SyncError::Fetch { .. } => "Failed to fetch data".to_string(),
            SyncError::Load { file, .. } => format!("Failed to populate {}", file),
            SyncError::Cleanup { .. } => {
                "Data loaded but staged files were not removed".to_string()
            }
        }
    }

    /// Underlying cause for the `details` field of an HTTP error body.
    pub fn details(&self) -> String {
        match self {
            SyncError::Load { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
