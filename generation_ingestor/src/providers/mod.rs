//! Provider abstraction for generation data sources.
//!
//! This module defines the [`GenerationProvider`] trait, the single seam between
//! the sync pipeline and whatever serves half-hourly generation figures. The
//! production implementation is [`elexon_rest::ElexonProvider`]; tests plug in
//! in-memory providers.
//!
//! The trait is async and object safe, so the pipeline holds it as
//! `Arc<dyn GenerationProvider + Send + Sync>`.
//!
//! Providers issue exactly one request per call. Retrying a failed fetch is the
//! caller's business.
//!
//! # Example
//!
//! ```rust
//! # use generation_ingestor::models::{record::RawRecord, window::TimeWindow};
//! # use generation_ingestor::providers::{GenerationProvider, ProviderError};
//! # use async_trait::async_trait;
//! struct EmptyProvider;
//! #[async_trait]
//! impl GenerationProvider for EmptyProvider {
//!     async fn fetch_generation(&self, _window: &TimeWindow) -> Result<Vec<RawRecord>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```
pub mod elexon_rest;
pub mod errors;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{record::RawRecord, window::TimeWindow};

#[async_trait]
pub trait GenerationProvider {
    /// Fetches every record the source publishes for `window`.
    async fn fetch_generation(&self, window: &TimeWindow) -> Result<Vec<RawRecord>, ProviderError>;
}
