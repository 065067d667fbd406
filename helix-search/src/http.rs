//! Shared HTTP client for upstream provider requests.
//!
//! Provides a configured [`reqwest::Client`] carrying the fixed client
//! identifier and the per-call timeout, plus a small helper that turns a
//! GET into either a body or a classified [`SearchError`].

use crate::config::SearchConfig;
use crate::error::SearchError;
use std::time::Duration;

/// Build a [`reqwest::Client`] for provider calls.
///
/// The client has:
/// - Timeout from config (covers connect, headers and body)
/// - The configured `User-Agent`
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// GET `url` with `params` and return the response body as text.
///
/// Non-2xx statuses, timeouts and read failures are all reported as errors
/// tagged with `provider`.
pub(crate) async fn get_text(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String, SearchError> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest(provider, e))?
        .error_for_status()
        .map_err(|e| SearchError::from_reqwest(provider, e))?;

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::from_reqwest(provider, e))?;

    tracing::trace!(provider, bytes = body.len(), "response received");
    Ok(body)
}

/// GET `url` with `params` and decode the body as loosely-typed JSON.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<serde_json::Value, SearchError> {
    let body = get_text(client, provider, url, params).await?;
    serde_json::from_str(&body)
        .map_err(|e| SearchError::Parse(format!("{provider} returned malformed JSON: {e}")))
}
