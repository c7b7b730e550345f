//! `GET /states/{state_id}/cities`.

pub mod cities;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/states";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{state_id}/cities", get().to(cities::process))
}
