//! Wire types for the trial service API.

pub mod models;
