use serde::{Deserialize, Serialize};

/// One row of the `states` table.
///
/// Administrative metadata (`fips_code`, `iso2`, `type`, `level`,
/// `parent_id`) is missing for many subdivisions, so it is optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub country_code: String,
    pub fips_code: Option<String>,
    pub iso2: Option<String>,
    #[serde(rename = "type")]
    pub state_type: Option<String>,
    pub level: Option<i64>,
    pub parent_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Option<String>,
    pub updated_at: String,
    pub flag: i16,
    pub wiki_data_id: Option<String>,
}
