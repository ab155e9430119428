use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::{
    models::{record::RawRecord, window::TimeWindow},
    providers::{
        GenerationProvider, ProviderError, ProviderInitError,
        elexon_rest::{params::construct_url, response::ElexonResponse},
    },
};

pub const DEFAULT_BASE_URL: &str =
    "https://data.elexon.co.uk/bmrs/api/v1/generation/actual/per-type/wind-and-solar";

/// Upper bound for one request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in [`ProviderError::Status`], in bytes.
pub const MAX_ERROR_BODY: usize = 512;

/// Cuts `body` to at most [`MAX_ERROR_BODY`] bytes on a char boundary.
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

pub struct ElexonProvider {
    client: Client,
    base_url: String,
}

impl ElexonProvider {
    /// Creates a provider against the public endpoint with the default timeout.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Creates a provider against `base_url` (no query string) with a request timeout.
    pub fn with_config(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        let base_url = base_url.into();
        if timeout.is_zero() {
            return Err(ProviderInitError::ZeroTimeout);
        }
        let parsed = Url::parse(&base_url).map_err(|e| ProviderInitError::BaseUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        if parsed.query().is_some() {
            return Err(ProviderInitError::BaseUrl {
                url: base_url,
                message: "must not carry a query string".into(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn request_url(&self, window: &TimeWindow) -> String {
        construct_url(&self.base_url, window)
    }
}

#[async_trait]
impl GenerationProvider for ElexonProvider {
    async fn fetch_generation(&self, window: &TimeWindow) -> Result<Vec<RawRecord>, ProviderError> {
        let url = self.request_url(window);
        tracing::debug!(%url, "requesting generation data");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ElexonResponse = serde_json::from_slice(&bytes)?;

        tracing::info!(records = parsed.data.len(), %window, "generation data fetched");
        Ok(parsed.data)
    }
}
