//! Small helpers shared by the ingestion and sync crates: environment lookups
//! and TOML config loading.

pub mod config;
pub mod env;
