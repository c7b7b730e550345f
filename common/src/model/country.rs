use serde::{Deserialize, Serialize};

/// One row of the `countries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub iso3: String,
    pub numeric_code: String,
    pub iso2: String,
    #[serde(rename = "phonecode")]
    pub phone_code: String,
    pub capital: String,
    pub currency: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub tld: String,
    pub native: Option<String>,
    pub region: String,
    pub region_id: Option<i64>,
    pub subregion: String,
    pub subregion_id: Option<i64>,
    pub nationality: String,
    /// JSON-encoded list, passed through as stored.
    pub timezones: String,
    /// JSON-encoded map, passed through as stored.
    pub translations: String,
    pub latitude: f64,
    pub longitude: f64,
    pub emoji: String,
    pub emoji_u: String,
    pub created_at: Option<String>,
    pub updated_at: String,
    pub flag: i16,
    pub wiki_data_id: Option<String>,
}
