//! Sync endpoints.
//!
//! - `GET|POST {sync_path}`: download every configured script, then load them
//!   in order. `?fetch_only=true` stops after the download.
//! - `GET|POST /populate-data`: load the scripts already in the data directory.
//! - `GET|POST /sync-and-populate`: download the designated script, load it
//!   and delete it.
//! - `POST {sync_path}/jobs`: run the full sync in the background and return a
//!   `job_id` right away.
//! - `GET {sync_path}/jobs/{job_id}`: poll a background job's `JobStatus`.
//!
//! `sync_path` defaults to `/sync-data` and comes from configuration.

pub mod jobs;
pub mod run;

use actix_web::web::{self, get, post, resource, scope};

pub fn configure(cfg: &mut web::ServiceConfig, sync_path: &str) {
    cfg.service(
        scope(sync_path)
            .service(
                resource("")
                    .route(get().to(run::sync))
                    .route(post().to(run::sync)),
            )
            .route("/jobs", post().to(jobs::start))
            .route("/jobs/{job_id}", get().to(jobs::status)),
    )
    .service(
        resource("/populate-data")
            .route(get().to(run::populate))
            .route(post().to(run::populate)),
    )
    .service(
        resource("/sync-and-populate")
            .route(get().to(run::sync_and_populate))
            .route(post().to(run::sync_and_populate)),
    );
}
