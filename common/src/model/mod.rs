//! Row-shaped records for the five geography tables.
//!
//! Every nullable column is an `Option` and serialises as `null`, so a
//! missing value never collapses into `""` or `0`.

pub mod city;
pub mod country;
pub mod region;
pub mod state;
pub mod subregion;
