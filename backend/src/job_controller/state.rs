//! Tracks background sync jobs started through the HTTP API.
//!
//! A job's status lives here from the moment `POST {sync_path}/jobs` registers
//! it until some time after it finishes, so clients can poll
//! `GET {sync_path}/jobs/{job_id}` for the outcome.
//!
//! The main components are:
//! - `JobsState`: clonable registry of job statuses, shared with handlers as
//!   `web::Data`. It is created in `main.rs`.
//! - `JobUpdate`: a status change sent by a running job.
//! - `start_job_updater`: the single task that applies updates to the registry.
//!
//! Finished jobs (`Completed` or `Failed`) are evicted once they are older than
//! the registry's TTL. Eviction runs whenever a job is registered or finishes,
//! so the map holds running jobs plus recently finished ones.

use common::jobs::JobStatus;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the update channel between running jobs and the updater task.
pub const UPDATE_CHANNEL_CAPACITY: usize = 100;

/// How long a finished job's status stays available for polling.
pub const FINISHED_JOB_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct JobEntry {
    status: JobStatus,
    finished_at: Option<Instant>,
}

impl JobEntry {
    fn new(status: JobStatus) -> Self {
        let finished_at = status.is_finished().then(Instant::now);
        Self {
            status,
            finished_at,
        }
    }

    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        self.finished_at
            .is_some_and(|at| now.saturating_duration_since(at) >= ttl)
    }
}

/// Shared registry of every job that is running or finished recently.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status. Only the updater task and job registration
    /// write here.
    jobs: Arc<RwLock<HashMap<String, JobEntry>>>,

    /// Where running jobs push their status changes.
    pub tx: mpsc::Sender<JobUpdate>,

    ttl: Duration,
}

/// A status change for one job, sent through `JobsState::tx` and applied by
/// `start_job_updater`.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
        }
    }
}

impl JobsState {
    /// Create an empty registry and the receiver `start_job_updater` drains.
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        Self::with_ttl(FINISHED_JOB_TTL)
    }

    /// Like [`JobsState::new`], keeping finished jobs for `ttl`.
    pub fn with_ttl(ttl: Duration) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
            ttl,
        };
        (state, rx)
    }

    /// Register a new job as `Pending` and return its id.
    pub async fn register(&self) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        let mut jobs = self.jobs.write().await;
        evict_expired(&mut jobs, self.ttl);
        jobs.insert(job_id.clone(), JobEntry::new(JobStatus::Pending));
        job_id
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .filter(|entry| !entry.expired(Instant::now(), self.ttl))
            .map(|entry| entry.status.clone())
    }

    /// Number of jobs currently held, expired ones included until evicted.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn apply(&self, update: JobUpdate) {
        let finished = update.status.is_finished();
        let mut jobs = self.jobs.write().await;
        jobs.insert(update.job_id, JobEntry::new(update.status));
        if finished {
            evict_expired(&mut jobs, self.ttl);
        }
    }
}

fn evict_expired(jobs: &mut HashMap<String, JobEntry>, ttl: Duration) {
    let now = Instant::now();
    jobs.retain(|_, entry| !entry.expired(now, ttl));
}

/// Starts the central job state updater task.
///
/// Spawn this once at startup (see `main.rs`). It applies every `JobUpdate`
/// received on `rx` to the shared registry, evicting expired finished jobs as
/// new ones finish, and returns once every sender is gone.
///
/// # Arguments
/// * `state` - The registry the updates are written to.
/// * `rx` - The receiver returned alongside `state` by `JobsState::new`.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        state.apply(update).await;
    }
}
