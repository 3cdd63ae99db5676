//! Read-only market-data REST clients
//!
//! Thin boundaries over the SaucerSwap and Bonzo HTTP APIs. Bodies pass
//! through as JSON; numeric precision stays whatever the API sent. Every
//! request carries a fixed timeout and failures surface the originating
//! endpoint.

mod bonzo;
mod saucerswap;

pub use bonzo::BonzoApi;
pub use saucerswap::{PlatformField, PlatformInterval, SaucerSwapApi};

use crate::error::{Error, Result};
use std::time::Duration;

/// Fixed REST timeout; ledger-side timeouts are the relay client's concern.
pub const DEFAULT_REST_TIMEOUT: Duration = Duration::from_secs(12);

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::network("http client", e))
}

pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
    query: &[(&str, String)],
) -> Result<serde_json::Value> {
    let mut request = client.get(url).query(query);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::network(url, e))?
        .error_for_status()
        .map_err(|e| Error::network(url, e))?;

    response.json().await.map_err(|e| Error::network(url, e))
}
