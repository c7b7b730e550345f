//! Shared fixtures for the integration tests: a remote source serving the
//! SQL files under `tests/fixtures`, and databases preloaded from them.

#![allow(dead_code)]

use async_trait::async_trait;
use countries_api::db::Database;
use countries_api::sync::{
    BulkLoader, FetchError, Fetcher, PipelineConfig, RemoteFileRef, RemoteSource, SyncService,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const OWNER: &str = "dr5hn";
pub const REPO: &str = "countries-states-cities-database";

/// Fixture scripts in load order, keyed by their path in the repository.
pub const FIXTURES: [(&str, &str); 5] = [
    ("sqlite/regions.sql", include_str!("fixtures/regions.sql")),
    ("sqlite/subregions.sql", include_str!("fixtures/subregions.sql")),
    ("sqlite/countries.sql", include_str!("fixtures/countries.sql")),
    ("sqlite/states.sql", include_str!("fixtures/states.sql")),
    ("sqlite/cities.sql", include_str!("fixtures/cities.sql")),
];

pub const WORLD_PATH: &str = "sqlite/world.sql";

/// The fixtures concatenated the way `sqlite3 .dump` writes them.
pub fn world_dump() -> String {
    let mut dump = String::from("PRAGMA foreign_keys=OFF;\nBEGIN TRANSACTION;\n");
    for (_, body) in FIXTURES {
        dump.push_str(body);
    }
    dump.push_str("COMMIT;\n");
    dump
}

/// Serves the fixture scripts; any other path answers 404.
pub struct FixtureSource {
    files: HashMap<String, String>,
}

impl FixtureSource {
    pub fn new() -> Self {
        let mut files: HashMap<String, String> = FIXTURES
            .iter()
            .map(|(path, body)| (path.to_string(), body.to_string()))
            .collect();
        files.insert(WORLD_PATH.to_string(), world_dump());
        Self { files }
    }

    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl RemoteSource for FixtureSource {
    fn label(&self) -> &str {
        "fixtures"
    }

    async fn fetch(&self, file: &RemoteFileRef) -> Result<Vec<u8>, FetchError> {
        self.files
            .get(&file.path)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| FetchError::RemoteFetch {
                status: Some(404),
                message: format!("{} not found", file.path),
            })
    }
}

pub fn pipeline(data_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        files: FIXTURES
            .iter()
            .map(|(path, _)| RemoteFileRef::new(OWNER, REPO, *path))
            .collect(),
        populate_file: RemoteFileRef::new(OWNER, REPO, WORLD_PATH),
        data_dir: data_dir.to_path_buf(),
        delete_after_load: false,
        timeout: Duration::from_secs(30),
    }
}

pub fn sync_service(db: &Database, source: FixtureSource, config: PipelineConfig) -> SyncService {
    SyncService::new(
        Fetcher::new(Arc::new(source), 8),
        BulkLoader::new(db.clone()),
        config,
    )
}

/// In-memory database with every fixture script applied.
pub fn loaded_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory database");
    {
        let conn = db.lock();
        for (path, body) in FIXTURES {
            conn.execute_batch(body)
                .unwrap_or_else(|err| panic!("failed to apply fixture {path}: {err}"));
        }
    }
    db
}
