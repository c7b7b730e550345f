//! In-process stand-ins for the remote source.

use super::{FetchError, RemoteFileRef, RemoteSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves canned file bodies after a fixed delay and records the highest
/// number of fetches running at once. Unknown paths answer 404.
pub struct CannedSource {
    files: HashMap<String, Vec<u8>>,
    delay: Duration,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl CannedSource {
    pub fn new(files: &[(&str, &str)], delay: Duration) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, body)| (path.to_string(), body.as_bytes().to_vec()))
                .collect(),
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteSource for CannedSource {
    fn label(&self) -> &str {
        "canned"
    }

    async fn fetch(&self, file: &RemoteFileRef) -> Result<Vec<u8>, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.files
            .get(&file.path)
            .cloned()
            .ok_or_else(|| FetchError::RemoteFetch {
                status: Some(404),
                message: format!("{} not found", file.path),
            })
    }
}
