//! Half-hourly wind and solar generation sync.
//!
//! Resolves a time window, fetches generation records from the Elexon BMRS
//! API, gates them through completeness and statistical checks, reshapes them
//! into curve rows, and upserts those into `power_data`.
//!
//! [`pipeline::Pipeline`] runs the stages; [`runner`] adds retries and the cron
//! trigger used by the `psr-sync` binary.

pub mod config;
pub mod db;
pub mod destination;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod runner;
pub mod schema;
pub mod transform;
pub mod window;
