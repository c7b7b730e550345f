use serde::{Deserialize, Serialize};

/// One row of the `cities` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub state_id: i64,
    pub state_code: String,
    pub country_id: i64,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Option<String>,
    pub updated_at: String,
    pub flag: i16,
    pub wiki_data_id: Option<String>,
}
