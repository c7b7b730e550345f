//! Download the public SQL dumps and load them into the database.
//!
//! The pipeline has three parts:
//! - `fetcher`: downloads a set of repository files concurrently into the
//!   data directory, reporting every failure instead of stopping at the first.
//! - `loader`: runs one staged script inside a transaction and optionally
//!   removes the script once the transaction has committed.
//! - `orchestrator`: sequences the two, loading scripts one at a time in
//!   dependency order (regions before subregions before countries before
//!   states before cities).

mod error;
mod fetcher;
mod loader;
mod orchestrator;
mod remote;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{FetchError, FileFailure, LoadError, SyncError};
pub use fetcher::Fetcher;
pub use loader::{normalize_script, BulkLoader, Remover};
pub use orchestrator::{collect_fetched, PopulateReport, SyncService};
pub use remote::{GithubSource, RemoteSource};

use std::path::{Path, PathBuf};
use std::time::Duration;

/// A file in a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl RemoteFileRef {
    pub fn new(owner: &str, repo: &str, path: impl Into<String>) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.into(),
        }
    }

    /// Last path segment; the name the file is staged under locally.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn staged_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

/// Result of fetching one file: the local path it was written to, or why not.
#[derive(Debug)]
pub struct FetchResult {
    pub path: String,
    pub outcome: Result<PathBuf, FetchError>,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// What the sync workflows operate on.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scripts in load order.
    pub files: Vec<RemoteFileRef>,
    /// Script used by the single-file sync-and-populate workflow.
    pub populate_file: RemoteFileRef,
    pub data_dir: PathBuf,
    /// Remove scripts loaded by the many-file workflows once committed.
    pub delete_after_load: bool,
    /// Deadline for one workflow run.
    pub timeout: Duration,
}
