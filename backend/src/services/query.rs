//! Shared plumbing for the read endpoints: one error type and a row loop
//! that stops at the first row it cannot decode.

use rusqlite::{Connection, Params, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("failed to decode row: {0}")]
    Decode(#[source] rusqlite::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run `sql` with `params` and decode every row with `decode`.
pub fn query_rows<T, P>(
    conn: &Connection,
    sql: &str,
    params: P,
    decode: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, QueryError>
where
    P: Params,
{
    let mut stmt = conn.prepare(sql).map_err(QueryError::Query)?;
    let mut rows = stmt.query(params).map_err(QueryError::Query)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(QueryError::Query)? {
        records.push(decode(row).map_err(QueryError::Decode)?);
    }
    Ok(records)
}
