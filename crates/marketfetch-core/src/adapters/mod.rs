//! Provider adapters.
//!
//! Each adapter owns one provider's endpoints and maps its payloads onto the
//! domain series types or schema-built [`Record`](crate::schema::Record)s.
//! Every operation issues at most one request per upstream resource and never
//! retries.

mod coingecko;
mod yahoo;

pub use coingecko::{CoinGeckoAdapter, CATALOG_LIMIT, SEARCH_LIMIT};
pub use yahoo::YahooAdapter;

use serde_json::Value;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::source::{ProviderId, SourceError};

/// Extracts a provider's own message from a decoded error body.
type ErrorMessage = fn(&Value) -> Option<String>;

/// Executes one request and decodes the body as JSON.
///
/// Non-success statuses become a [`SourceError`] carrying the provider's
/// message when `error_message` finds one, otherwise a status description.
async fn fetch_json(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
    error_message: ErrorMessage,
) -> Result<Value, SourceError> {
    debug!(%provider, url = %request.url, "sending request");

    let response = http_client.execute(request).await.map_err(|error| {
        SourceError::unavailable(
            provider,
            format!("{provider} transport error: {}", error.message()),
        )
    })?;

    debug!(
        %provider,
        status = response.status,
        bytes = response.body.len(),
        "received response"
    );

    let decoded = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        let message = decoded
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| format!("{provider} returned status {}", response.status));
        return Err(SourceError::from_status(provider, response.status, message));
    }

    decoded.map_err(|error| {
        SourceError::malformed(provider, format!("failed to parse {provider} response: {error}"))
    })
}
