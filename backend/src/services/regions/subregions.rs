use crate::db::Database;
use crate::services::error_response;
use crate::services::query::{query_rows, QueryError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::model::subregion::Subregion;
use log::error;
use rusqlite::{params, Connection, Row};

const BY_REGION: &str = "SELECT id, name, translations, region_id, created_at, updated_at, \
     flag, wikiDataId AS wiki_data_id FROM subregions WHERE region_id = ?1 ORDER BY id";

pub(crate) async fn process(db: web::Data<Database>, region_id: web::Path<i64>) -> impl Responder {
    let region_id = region_id.into_inner();
    match db.run(move |conn| get_subregions(conn, region_id)).await {
        Ok(subregions) => HttpResponse::Ok().json(subregions),
        Err(e) => {
            error!("Failed to fetch subregions of region {}: {}", region_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch subregions", e)
        }
    }
}

pub fn get_subregions(conn: &Connection, region_id: i64) -> Result<Vec<Subregion>, QueryError> {
    query_rows(conn, BY_REGION, params![region_id], subregion_from_row)
}

pub fn subregion_from_row(row: &Row<'_>) -> rusqlite::Result<Subregion> {
    Ok(Subregion {
        id: row.get("id")?,
        name: row.get("name")?,
        translations: row.get("translations")?,
        region_id: row.get("region_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        flag: row.get("flag")?,
        wiki_data_id: row.get("wiki_data_id")?,
    })
}
