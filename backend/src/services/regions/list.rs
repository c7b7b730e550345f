use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::region::Region;
use log::error;
use rusqlite::{Connection, Row};

const ALL: &str = "SELECT id, name, translations, created_at, updated_at, flag, \
     wikiDataId AS wiki_data_id FROM regions ORDER BY id";

pub(crate) async fn process(db: web::Data<Database>) -> impl Responder {
    match db.run(|conn| get_regions(conn)).await {
        Ok(regions) => HttpResponse::Ok().json(regions),
        Err(e) => {
            error!("Failed to fetch regions: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch regions", e)
        }
    }
}

pub fn get_regions(conn: &Connection) -> Result<Vec<Region>, QueryError> {
    query_rows(conn, ALL, [], region_from_row)
}

pub fn region_from_row(row: &Row<'_>) -> rusqlite::Result<Region> {
    Ok(Region {
        id: row.get("id")?,
        name: row.get("name")?,
        translations: row.get("translations")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        flag: row.get("flag")?,
        wiki_data_id: row.get("wiki_data_id")?,
    })
}
