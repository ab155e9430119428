//! Source side of the half-hourly generation sync.
//!
//! - [`models`]: the request window and the record shapes returned by the API.
//! - [`providers`]: the [`providers::GenerationProvider`] trait and the Elexon
//!   BMRS REST implementation.

pub mod models;
pub mod providers;
