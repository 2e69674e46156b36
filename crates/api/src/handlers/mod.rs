//! HTTP handlers for the PreventIA REST surface (§6).

pub mod analytics;
pub mod articles;
pub mod compliance;
pub mod scrapers;
pub mod sources;
