//! Process configuration, read once at startup from flags or the environment.

use crate::db::DbError;
use crate::sync::{PipelineConfig, RemoteFileRef};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Scripts in load order: every table is created after the tables it references.
pub const DEFAULT_FILES: [&str; 6] = [
    "regions.sql",
    "subregions.sql",
    "countries.sql",
    "states.sql",
    "cities.sql",
    "world.sql",
];

#[derive(Debug, Clone, Parser)]
#[command(
    name = "countries-api",
    about = "Serves countries, states and cities loaded from the public SQL dumps",
    version
)]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file the scripts are loaded into.
    #[arg(long, env = "DATABASE_PATH", default_value = "countries.sqlite")]
    pub database_path: PathBuf,

    /// Directory downloaded scripts are staged in.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Route of the sync endpoint.
    #[arg(long, env = "SYNC_PATH", default_value = "/sync-data")]
    pub sync_path: String,

    #[arg(long, env = "SOURCE_OWNER", default_value = "dr5hn")]
    pub source_owner: String,

    #[arg(long, env = "SOURCE_REPO", default_value = "countries-states-cities-database")]
    pub source_repo: String,

    /// Directory inside the repository holding the scripts.
    #[arg(long, env = "SOURCE_DIR", default_value = "sqlite")]
    pub source_dir: String,

    /// Branch, tag or commit to read from; the default branch when unset.
    #[arg(long, env = "SOURCE_REF")]
    pub source_ref: Option<String>,

    /// Script names, in load order.
    #[arg(
        long,
        env = "SYNC_FILES",
        value_delimiter = ',',
        default_values_t = DEFAULT_FILES.map(String::from)
    )]
    pub files: Vec<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Script fetched and loaded by `/sync-and-populate`.
    #[arg(long, env = "POPULATE_FILE", default_value = "world.sql")]
    pub populate_file: String,

    /// Remove each staged script once its load has committed.
    #[arg(long, env = "DELETE_AFTER_LOAD", default_value_t = false)]
    pub delete_after_load: bool,

    #[arg(long, env = "MAX_CONCURRENT_FETCHES", default_value_t = 8)]
    pub max_concurrent_fetches: usize,

    /// Deadline for one sync workflow, downloads and loads included.
    #[arg(long, env = "SYNC_TIMEOUT_SECS", default_value_t = 600)]
    pub sync_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> Result<(), StartupError> {
        if !self.sync_path.starts_with('/') || self.sync_path.len() < 2 {
            return Err(StartupError::InvalidConfig(format!(
                "sync path must start with '/' and name a route, got {:?}",
                self.sync_path
            )));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(StartupError::InvalidConfig(
                "max concurrent fetches must be at least 1".to_string(),
            ));
        }
        if self.files.is_empty() || self.files.iter().any(|f| f.trim().is_empty()) {
            return Err(StartupError::InvalidConfig(
                "file list must name at least one script".to_string(),
            ));
        }
        if self.sync_timeout_secs == 0 {
            return Err(StartupError::InvalidConfig(
                "sync timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Repository reference for one script name under `source_dir`.
    pub fn remote_ref(&self, file_name: &str) -> RemoteFileRef {
        let dir = self.source_dir.trim_matches('/');
        let path = if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        };
        RemoteFileRef::new(&self.source_owner, &self.source_repo, path)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            files: self.files.iter().map(|f| self.remote_ref(f.trim())).collect(),
            populate_file: self.remote_ref(&self.populate_file),
            data_dir: self.data_dir.clone(),
            delete_after_load: self.delete_after_load,
            timeout: Duration::from_secs(self.sync_timeout_secs),
        }
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("database unavailable: {0}")]
    Database(#[from] DbError),

    #[error("failed to create data directory {path:?}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
