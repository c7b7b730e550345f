//! Country endpoints.
//!
//! - `GET /countries`: every country, or those matching an `id` or `iso3` filter.
//! - `GET /countries/{country_id}`: one country, `404` when absent.
//! - `GET /countries/{country_id}/states`: the states of one country.

pub mod get;
pub mod list;
pub mod states;

use actix_web::web::{get, scope};
use actix_web::Scope;
use common::model::country::Country;
use rusqlite::Row;

const API_PATH: &str = "/countries";

/// `SELECT` over `countries` with columns aliased to the record's field names,
/// followed by `$tail`.
macro_rules! select_countries {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, iso3, numeric_code, iso2, phonecode, capital, currency, ",
            "currency_name, currency_symbol, tld, native, region, region_id, subregion, ",
            "subregion_id, nationality, timezones, translations, latitude, longitude, emoji, ",
            "emojiU AS emoji_u, created_at, updated_at, flag, wikiDataId AS wiki_data_id ",
            "FROM countries",
            $tail
        )
    };
}
pub(crate) use select_countries;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{country_id}", get().to(get::process))
        .route("/{country_id}/states", get().to(states::process))
}

pub fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get("id")?,
        name: row.get("name")?,
        iso3: row.get("iso3")?,
        numeric_code: row.get("numeric_code")?,
        iso2: row.get("iso2")?,
        phone_code: row.get("phonecode")?,
        capital: row.get("capital")?,
        currency: row.get("currency")?,
        currency_name: row.get("currency_name")?,
        currency_symbol: row.get("currency_symbol")?,
        tld: row.get("tld")?,
        native: row.get("native")?,
        region: row.get("region")?,
        region_id: row.get("region_id")?,
        subregion: row.get("subregion")?,
        subregion_id: row.get("subregion_id")?,
        nationality: row.get("nationality")?,
        timezones: row.get("timezones")?,
        translations: row.get("translations")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        emoji: row.get("emoji")?,
        emoji_u: row.get("emoji_u")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        flag: row.get("flag")?,
        wiki_data_id: row.get("wiki_data_id")?,
    })
}
