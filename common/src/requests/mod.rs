use serde::Deserialize;

/// Query parameters accepted by `GET /countries`.
///
/// At most one filter is applied: `id` wins over `iso3`, and with neither
/// present every country is returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryFilter {
    pub id: Option<i64>,
    pub iso3: Option<String>,
}

/// Query parameters accepted by the sync endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncParams {
    /// Stop after downloading; leave the staged scripts for `/populate-data`.
    #[serde(default)]
    pub fetch_only: bool,
}
