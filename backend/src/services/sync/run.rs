//! Handlers for the synchronous sync workflows. Each one runs its workflow to
//! the end before answering, with `200 OK` and
//! `{"message", "fetched", "loaded"}` on success or `500` with the JSON error
//! body carrying `SyncError::summary` and `SyncError::details`.

use crate::services::error_response;
use crate::sync::{PopulateReport, SyncError, SyncService};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::requests::SyncParams;
use log::error;

/// The Actix web handler for `GET|POST {sync_path}`.
///
/// Downloads every configured script and loads them in order. With
/// `?fetch_only=true` it stops after the downloads.
///
/// # Arguments
/// * `service` - The shared `SyncService`, injected by Actix.
/// * `params` - Query string; only `fetch_only` is read.
pub(crate) async fn sync(
    service: web::Data<SyncService>,
    params: web::Query<SyncParams>,
) -> impl Responder {
    if params.fetch_only {
        respond(service.fetch_all().await, "All files downloaded successfully")
    } else {
        respond(
            service.sync_all().await,
            "All files downloaded and populated successfully",
        )
    }
}

/// `GET|POST /populate-data`
pub(crate) async fn populate(service: web::Data<SyncService>) -> impl Responder {
    respond(service.populate_all().await, "All data populated successfully")
}

/// `GET|POST /sync-and-populate`
pub(crate) async fn sync_and_populate(service: web::Data<SyncService>) -> impl Responder {
    respond(
        service.sync_and_populate_one().await,
        "Data synced and populated successfully",
    )
}

fn respond(result: Result<PopulateReport, SyncError>, message: &str) -> HttpResponse {
    match result {
        Ok(report) => HttpResponse::Ok().json(serde_json::json!({
            "message": message,
            "fetched": report.fetched,
            "loaded": report.loaded,
        })),
        Err(e) => {
            error!("{}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.summary(), e.details())
        }
    }
}
