//! Region endpoints: `GET /regions` and `GET /regions/{region_id}/subregions`.

pub mod list;
pub mod subregions;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/regions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{region_id}/subregions", get().to(subregions::process))
}
