//! Core of the NFHS dashboard: CSV ingestion and the filter/reshape views
//! the dashboard renders.

pub mod data;
