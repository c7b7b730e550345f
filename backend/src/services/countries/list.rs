use super::{country_from_row, select_countries};
use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::country::Country;
use common::requests::CountryFilter;
use log::error;
use rusqlite::{params, Connection};

const ALL: &str = select_countries!(" ORDER BY id");
const BY_ID: &str = select_countries!(" WHERE id = ?1");
const BY_ISO3: &str = select_countries!(" WHERE iso3 = ?1 ORDER BY id");

/// The Actix web handler for `GET /countries?id=..|iso3=..`.
///
/// # Arguments
/// * `db` - The shared `Database`, injected by Actix.
/// * `filter` - Optional `id` and `iso3`; a malformed `id` is rejected with
///   `400` by the query extractor before this runs.
///
/// # Returns
/// `200 OK` with a JSON array (possibly empty), or `500` when the query fails.
pub(crate) async fn process(
    db: web::Data<Database>,
    filter: web::Query<CountryFilter>,
) -> impl Responder {
    let filter = filter.into_inner();
    match db.run(move |conn| get_countries(conn, &filter)).await {
        Ok(countries) => HttpResponse::Ok().json(countries),
        Err(e) => {
            error!("Failed to fetch countries: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch countries", e)
        }
    }
}

/// Countries matching `filter`.
///
/// Only one filter applies: `id` first, then `iso3`; with neither (or a blank
/// `iso3`) every country is returned.
pub fn get_countries(
    conn: &Connection,
    filter: &CountryFilter,
) -> Result<Vec<Country>, QueryError> {
    let iso3 = filter.iso3.as_deref().map(str::trim).filter(|s| !s.is_empty());
    match (filter.id, iso3) {
        (Some(id), _) => query_rows(conn, BY_ID, params![id], country_from_row),
        (None, Some(iso3)) => query_rows(conn, BY_ISO3, params![iso3], country_from_row),
        (None, None) => query_rows(conn, ALL, [], country_from_row),
    }
}
