//! Types shared between the API server and its clients: the row-shaped
//! geography records, request parameters, and background job status.

pub mod jobs;
pub mod model;
pub mod requests;
