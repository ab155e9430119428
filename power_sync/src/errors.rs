//! Error types for every pipeline stage.
//!
//! Each stage has its own enum; [`PipelineError`] wraps them and names the
//! stage that failed, so the runner can decide whether a retry makes sense.

use chrono::{DateTime, Utc};
use generation_ingestor::{
    models::window::{TimeWindow, WindowError},
    providers::ProviderError,
};
use thiserror::Error;

use crate::quality::QualityReport;

/// Bad run parameters. Never retried: the same input fails the same way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Expected format is 'YYYY-MM-DD HH:MM'.")]
    Format { input: String },

    #[error("From date must be before or equal to To date.")]
    Order {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Date range should not exceed {max_days} days.")]
    Range { max_days: i64 },

    #[error("Minutes must be either 00 or 30.")]
    Minutes,

    #[error(transparent)]
    Window(#[from] WindowError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// HTTP 200 with an empty `data` array; usually the publisher is behind.
    #[error("API returned no records for {window}")]
    Empty { window: TimeWindow },
}

impl FetchError {
    /// HTTP status of the failed call, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Provider(e) => e.status(),
            FetchError::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("data quality checks failed: {}", .0.summary())]
    Failed(Box<QualityReport>),

    #[error("record {index} could not be decoded")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("schema migration failed: {0}")]
    Migration(String),

    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// Carries the scheme only; the full URL may hold credentials.
    #[error("unsupported database URL scheme `{0}`")]
    UnsupportedUrl(String),

    #[error("sync task did not complete: {0}")]
    Task(String),
}

/// A failed run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parameter stage failed: {0}")]
    Parameter(#[from] ParameterError),

    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("validation stage failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("sync stage failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Parameter(_) => "parameter",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Validation(_) => "validation",
            PipelineError::Persistence(_) => "sync",
        }
    }

    /// Whether running the whole pipeline again could succeed.
    ///
    /// Bad parameters and records that pass the gate but do not decode fail
    /// the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            PipelineError::Parameter(_) | PipelineError::Validation(ValidationError::Decode { .. })
        )
    }
}
