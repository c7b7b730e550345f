//! # Background Sync Jobs
//!
//! Runs the full download-and-load workflow outside the request/response cycle.
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: `POST {sync_path}/jobs` reaches `start`.
//!
//! 2.  **Job Scheduling**: `schedule_sync_job` registers a `Pending` job in the
//!     shared `JobsState`, spawns a Tokio task for it and returns the `job_id`,
//!     which `start` answers with `202 Accepted`.
//!
//! 3.  **Background Processing**: the task runs `SyncService::sync_all_with_progress`.
//!     Downloads run concurrently, then scripts load one at a time in order.
//!
//! 4.  **Progress Reporting**: after every committed script the task sends
//!     `InProgress(percent)` through the job controller's update channel, and
//!     finally `Completed` or `Failed` with the error summary and details.
//!
//! 5.  **Polling**: `GET {sync_path}/jobs/{job_id}` (`status`) returns the latest
//!     `JobStatus`, or `404` once the id is unknown or its finished entry expired.

use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::error_response;
use crate::sync::SyncService;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use log::{info, warn};

/// The Actix web handler for `POST {sync_path}/jobs`.
///
/// # Arguments
/// * `service` - The shared `SyncService` the job runs.
/// * `jobs` - The shared `JobsState` the job is registered in.
///
/// # Returns
/// `202 Accepted` with `{"job_id": ...}`.
pub(crate) async fn start(
    service: web::Data<SyncService>,
    jobs: web::Data<JobsState>,
) -> impl Responder {
    let job_id = schedule_sync_job(service.get_ref().clone(), jobs.get_ref().clone()).await;
    HttpResponse::Accepted().json(serde_json::json!({ "job_id": job_id }))
}

/// The Actix web handler for `GET {sync_path}/jobs/{job_id}`.
///
/// # Returns
/// `200 OK` with the job's `JobStatus`, or `404 Not Found` with the JSON error
/// body when no such job is held.
pub(crate) async fn status(
    job_id: web::Path<String>,
    jobs: web::Data<JobsState>,
) -> impl Responder {
    match jobs.status(&job_id).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => error_response(StatusCode::NOT_FOUND, "Job ID not found", job_id.as_str()),
    }
}

/// Register a sync job and run it on a spawned Tokio task.
///
/// Returns as soon as the job is registered; the task reports its progress and
/// outcome through `jobs.tx`.
///
/// # Arguments
/// * `service` - Runs the full sync; moved into the spawned task.
/// * `jobs` - Registry the job is added to.
///
/// # Returns
/// The new job's id, for polling.
pub async fn schedule_sync_job(service: SyncService, jobs: JobsState) -> String {
    let job_id = jobs.register().await;
    let tx = jobs.tx.clone();
    let id = job_id.clone();

    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let progress_id = id.clone();
        let result = service
            .sync_all_with_progress(move |done, total| {
                let percent = (done * 100 / total.max(1)) as u32;
                // Progress dropped on a full channel is superseded by the final status.
                let _ = progress_tx.try_send(JobUpdate::new(
                    progress_id.clone(),
                    JobStatus::InProgress(percent),
                ));
            })
            .await;

        let status = match result {
            Ok(report) => {
                info!("Sync job {} completed", id);
                JobStatus::Completed(format!(
                    "Downloaded {} and populated {} files",
                    report.fetched.len(),
                    report.loaded.len()
                ))
            }
            Err(e) => {
                warn!("Sync job {} failed: {}", id, e);
                JobStatus::Failed(format!("{}: {}", e.summary(), e.details()))
            }
        };
        let _ = tx.send(JobUpdate::new(id, status)).await;
    });

    job_id
}
