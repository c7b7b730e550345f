//! HTTP endpoints, grouped by resource.
//!
//! - `welcome`: `GET /`.
//! - `sync`: the fetch and populate workflows plus background sync jobs.
//! - `countries`, `regions`, `states`: read-only queries over the loaded tables.

pub mod countries;
pub mod query;
pub mod regions;
pub mod states;
pub mod sync;
pub mod welcome;

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use std::fmt::Display;

/// Answer malformed query strings and path segments with the shared JSON error
/// body instead of actix's plain-text default.
pub(crate) fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            "Invalid query parameters",
            &err,
        );
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::NOT_FOUND, "Resource not found", &err);
        InternalError::from_response(err, response).into()
    }));
}

/// JSON error body shared by every endpoint: `{ "error": ..., "details": ... }`.
pub(crate) fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Display,
) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error.into(),
        "details": details.to_string(),
    }))
}
