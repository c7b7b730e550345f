use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::city::City;
use log::error;
use rusqlite::{params, Connection, Row};

const BY_STATE: &str = "SELECT id, name, state_id, state_code, country_id, country_code, \
     latitude, longitude, created_at, updated_at, flag, wikiDataId AS wiki_data_id \
     FROM cities WHERE state_id = ?1 ORDER BY name";

pub(crate) async fn process(db: web::Data<Database>, state_id: web::Path<i64>) -> impl Responder {
    let state_id = state_id.into_inner();
    match db.run(move |conn| get_cities(conn, state_id)).await {
        Ok(cities) => HttpResponse::Ok().json(cities),
        Err(e) => {
            error!("Failed to fetch cities of state {}: {}", state_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch cities", e)
        }
    }
}

pub fn get_cities(conn: &Connection, state_id: i64) -> Result<Vec<City>, QueryError> {
    query_rows(conn, BY_STATE, params![state_id], city_from_row)
}

pub fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get("id")?,
        name: row.get("name")?,
        state_id: row.get("state_id")?,
        state_code: row.get("state_code")?,
        country_id: row.get("country_id")?,
        country_code: row.get("country_code")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        flag: row.get("flag")?,
        wiki_data_id: row.get("wiki_data_id")?,
    })
}
