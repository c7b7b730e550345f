use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::state::State;
use log::error;
use rusqlite::{params, Connection, Row};

const BY_COUNTRY: &str = "SELECT id, name, country_id, country_code, fips_code, iso2, \
     type AS state_type, level, parent_id, latitude, longitude, created_at, updated_at, \
     flag, wikiDataId AS wiki_data_id \
     FROM states WHERE country_id = ?1 ORDER BY name";

/// `GET /countries/{country_id}/states`
pub(crate) async fn process(db: web::Data<Database>, country_id: web::Path<i64>) -> impl Responder {
    let country_id = country_id.into_inner();
    match db.run(move |conn| get_states(conn, country_id)).await {
        Ok(states) => HttpResponse::Ok().json(states),
        Err(e) => {
            error!("Failed to fetch states of country {}: {}", country_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch states", e)
        }
    }
}

pub fn get_states(conn: &Connection, country_id: i64) -> Result<Vec<State>, QueryError> {
    query_rows(conn, BY_COUNTRY, params![country_id], state_from_row)
}

pub fn state_from_row(row: &Row<'_>) -> rusqlite::Result<State> {
    Ok(State {
        id: row.get("id")?,
        name: row.get("name")?,
        country_id: row.get("country_id")?,
        country_code: row.get("country_code")?,
        fips_code: row.get("fips_code")?,
        iso2: row.get("iso2")?,
        state_type: row.get("state_type")?,
        level: row.get("level")?,
        parent_id: row.get("parent_id")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        flag: row.get("flag")?,
        wiki_data_id: row.get("wiki_data_id")?,
    })
}
