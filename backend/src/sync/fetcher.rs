use super::{FetchError, FetchResult, RemoteFileRef, RemoteSource};
use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::time::{timeout_at, Instant};

/// Downloads repository files into a local directory, several at a time.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn RemoteSource>,
    max_concurrency: usize,
}

impl Fetcher {
    pub fn new(source: Arc<dyn RemoteSource>, max_concurrency: usize) -> Self {
        Self {
            source,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetch every file into `dest`, returning one result per file in input order.
    ///
    /// Files are fetched concurrently, at most `max_concurrency` at once, and the
    /// call returns only after each of them succeeded or failed. A failure never
    /// cancels its siblings. Only failing to create `dest` fails the whole call.
    pub async fn fetch(
        &self,
        files: &[RemoteFileRef],
        dest: &Path,
        deadline: Instant,
    ) -> Result<Vec<FetchResult>, FetchError> {
        std::fs::create_dir_all(dest).map_err(|source| FetchError::DirectoryCreate {
            path: dest.to_path_buf(),
            source,
        })?;

        let limit = self.max_concurrency.min(files.len()).max(1);
        info!(
            "Fetching {} files from {} ({} at a time)",
            files.len(),
            self.source.label(),
            limit
        );
        // Owned items keep these futures `Send` when the caller is spawned.
        let results = stream::iter(files.iter().cloned())
            .map(|file| async move {
                let outcome = self.fetch_one(&file, dest, deadline).await;
                match &outcome {
                    Ok(path) => info!("Successfully downloaded: {}", path.display()),
                    Err(e) => warn!("Failed to download {}: {}", file.path, e),
                }
                FetchResult {
                    path: file.path,
                    outcome,
                }
            })
            .buffered(limit)
            .collect::<Vec<_>>()
            .await;

        Ok(results)
    }

    async fn fetch_one(
        &self,
        file: &RemoteFileRef,
        dest: &Path,
        deadline: Instant,
    ) -> Result<PathBuf, FetchError> {
        let bytes = timeout_at(deadline, self.source.fetch(file))
            .await
            .map_err(|_| FetchError::Timeout)??;

        let dir = dest.to_path_buf();
        let target = file.staged_path(dest);
        let target_for_write = target.clone();
        tokio::task::spawn_blocking(move || write_artifact(&dir, &target_for_write, &bytes))
            .await
            .map_err(|e| FetchError::FileWrite {
                path: target.clone(),
                source: io::Error::other(e.to_string()),
            })?
            .map_err(|source| FetchError::FileWrite {
                path: target.clone(),
                source,
            })?;

        Ok(target)
    }
}

/// Write `bytes` next to `target` and rename over it, replacing any earlier copy
/// without ever exposing a partially written file.
fn write_artifact(dir: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
