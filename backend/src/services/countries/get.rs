use super::{country_from_row, select_countries};
use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::country::Country;
use log::error;
use rusqlite::{params, Connection};

const BY_ID: &str = select_countries!(" WHERE id = ?1");

/// The Actix web handler for `GET /countries/{country_id}`.
///
/// # Returns
/// `200 OK` with the country, `404 Not Found` when no row has that id, or `500`
/// when the query fails.
pub(crate) async fn process(db: web::Data<Database>, country_id: web::Path<i64>) -> impl Responder {
    let country_id = country_id.into_inner();
    match db.run(move |conn| get_country(conn, country_id)).await {
        Ok(country) => HttpResponse::Ok().json(country),
        Err(e @ QueryError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Country not found", e)
        }
        Err(e) => {
            error!("Failed to fetch country {}: {}", country_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch country", e)
        }
    }
}

pub fn get_country(conn: &Connection, country_id: i64) -> Result<Country, QueryError> {
    query_rows(conn, BY_ID, params![country_id], country_from_row)?
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::NotFound(format!("country {}", country_id)))
}
