use serde::{Deserialize, Serialize};

/// One row of the `subregions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subregion {
    pub id: i64,
    pub name: String,
    pub translations: String,
    pub region_id: i64,
    pub created_at: Option<String>,
    pub updated_at: String,
    pub flag: i16,
    pub wiki_data_id: Option<String>,
}
