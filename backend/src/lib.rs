//! HTTP service that downloads the public countries/states/cities SQL dumps,
//! loads them into SQLite and serves read-only queries over the result.

pub mod config;
pub mod db;
pub mod job_controller;
pub mod services;
pub mod sync;

use crate::db::Database;
use crate::job_controller::state::JobsState;
use crate::sync::SyncService;
use actix_web::web;

/// Register every route. Shared state (`Database`, `SyncService`, `JobsState`)
/// must already be attached to the `App` as `web::Data`.
pub fn configure_app(cfg: &mut web::ServiceConfig, sync_path: &str) {
    services::configure_extractors(cfg);
    cfg.route("/", web::get().to(services::welcome::process))
        .service(services::countries::configure_routes())
        .service(services::regions::configure_routes())
        .service(services::states::configure_routes());
    services::sync::configure(cfg, sync_path);
}

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: web::Data<Database>,
    pub sync: web::Data<SyncService>,
    pub jobs: web::Data<JobsState>,
}

impl AppState {
    pub fn new(db: Database, sync: SyncService, jobs: JobsState) -> Self {
        Self {
            db: web::Data::new(db),
            sync: web::Data::new(sync),
            jobs: web::Data::new(jobs),
        }
    }
}
