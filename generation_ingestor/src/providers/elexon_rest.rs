//! Elexon BMRS "actual generation per type, wind and solar" REST source.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ElexonProvider, MAX_ERROR_BODY};
