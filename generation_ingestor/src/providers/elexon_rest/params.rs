use chrono::{DateTime, Utc};

use crate::models::window::TimeWindow;

/// Format the API expects for `from` / `to`.
pub const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats a timestamp for the query string and percent-encodes it.
///
/// `2024-10-16 14:30` becomes `2024-10-16%2014%3A30`.
pub fn url_friendly_datetime(dt: DateTime<Utc>) -> String {
    urlencoding::encode(&dt.format(QUERY_DATETIME_FORMAT).to_string()).into_owned()
}

/// Builds the full request URL for `window` against `base_url`.
pub fn construct_url(base_url: &str, window: &TimeWindow) -> String {
    format!(
        "{base_url}?from={}&to={}&format=json",
        url_friendly_datetime(window.from()),
        url_friendly_datetime(window.to())
    )
}
