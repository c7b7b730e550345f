use super::{
    BulkLoader, FetchResult, Fetcher, FileFailure, PipelineConfig, RemoteFileRef, SyncError,
};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use tokio::time::Instant;

/// What a successful workflow did, returned in the HTTP response body.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct PopulateReport {
    /// Local paths of the scripts downloaded by this run.
    pub fetched: Vec<String>,
    /// Script names committed by this run, in load order.
    pub loaded: Vec<String>,
}

/// Runs the fetch and load workflows over one configured file set.
#[derive(Clone)]
pub struct SyncService {
    fetcher: Fetcher,
    loader: BulkLoader,
    config: PipelineConfig,
}

impl SyncService {
    pub fn new(fetcher: Fetcher, loader: BulkLoader, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            loader,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.config.timeout
    }

    /// Download every configured script, failing if any download failed.
    pub async fn fetch_all(&self) -> Result<PopulateReport, SyncError> {
        let fetched = self.fetch_files(&self.config.files, self.deadline()).await?;
        Ok(PopulateReport {
            fetched,
            loaded: Vec::new(),
        })
    }

    /// Load the already staged scripts in order.
    pub async fn populate_all(&self) -> Result<PopulateReport, SyncError> {
        self.populate_staged(self.deadline(), |_, _| {}).await
    }

    /// Download every script, then load them one by one in order.
    pub async fn sync_all(&self) -> Result<PopulateReport, SyncError> {
        self.sync_all_with_progress(|_, _| {}).await
    }

    /// [`SyncService::sync_all`], calling `progress(loaded, total)` after each
    /// committed script.
    pub async fn sync_all_with_progress<F>(&self, progress: F) -> Result<PopulateReport, SyncError>
    where
        F: FnMut(usize, usize) + Send,
    {
        let deadline = self.deadline();
        let fetched = self.fetch_files(&self.config.files, deadline).await?;
        let mut report = self.populate_staged(deadline, progress).await?;
        report.fetched = fetched;
        Ok(report)
    }

    /// Download the designated script, load it and remove it.
    pub async fn sync_and_populate_one(&self) -> Result<PopulateReport, SyncError> {
        let deadline = self.deadline();
        let file = &self.config.populate_file;
        let fetched = self
            .fetch_files(std::slice::from_ref(file), deadline)
            .await?;
        let path = file.staged_path(&self.config.data_dir);

        match self.loader.load(path, true, deadline).await {
            Ok(()) => {}
            Err(e) if e.is_committed() => {
                return Err(SyncError::Cleanup { failures: vec![e] });
            }
            Err(source) => {
                return Err(SyncError::Load {
                    file: file.file_name().to_string(),
                    source,
                });
            }
        }

        Ok(PopulateReport {
            fetched,
            loaded: vec![file.file_name().to_string()],
        })
    }

    async fn fetch_files(
        &self,
        files: &[RemoteFileRef],
        deadline: Instant,
    ) -> Result<Vec<String>, SyncError> {
        let results = self
            .fetcher
            .fetch(files, &self.config.data_dir, deadline)
            .await
            .map_err(|error| SyncError::Fetch {
                failures: vec![FileFailure {
                    path: self.config.data_dir.display().to_string(),
                    error,
                }],
            })?;
        let paths = collect_fetched(results)?;
        info!("All {} files downloaded", paths.len());
        Ok(paths
            .into_iter()
            .map(|p| p.display().to_string())
            .collect())
    }

    /// Scripts load strictly in configured order. The first failure stops the
    /// sequence; scripts before it stay committed. Cleanup failures do not stop
    /// it, since their data is already in place, but are reported at the end.
    async fn populate_staged<F>(
        &self,
        deadline: Instant,
        mut progress: F,
    ) -> Result<PopulateReport, SyncError>
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = self.config.files.len();
        let mut report = PopulateReport::default();
        let mut cleanup_failures = Vec::new();

        for (index, file) in self.config.files.iter().enumerate() {
            let path = file.staged_path(&self.config.data_dir);
            match self
                .loader
                .load(path, self.config.delete_after_load, deadline)
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_committed() => {
                    warn!("{}", e);
                    cleanup_failures.push(e);
                }
                Err(source) => {
                    return Err(SyncError::Load {
                        file: file.file_name().to_string(),
                        source,
                    });
                }
            }
            report.loaded.push(file.file_name().to_string());
            progress(index + 1, total);
        }

        if !cleanup_failures.is_empty() {
            return Err(SyncError::Cleanup {
                failures: cleanup_failures,
            });
        }
        info!("All data populated successfully");
        Ok(report)
    }
}

/// Turn per-file fetch results into the written paths, or one error listing
/// every failed file.
pub fn collect_fetched(results: Vec<FetchResult>) -> Result<Vec<PathBuf>, SyncError> {
    let mut paths = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result.outcome {
            Ok(path) => paths.push(path),
            Err(error) => failures.push(FileFailure {
                path: result.path,
                error,
            }),
        }
    }
    if failures.is_empty() {
        Ok(paths)
    } else {
        Err(SyncError::Fetch { failures })
    }
}
