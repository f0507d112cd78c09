//! Response helpers shared by the upstream clients.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::UpstreamError;

/// `{ "data": ... }` envelope used by the inference service.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Build a pooled client with an optional per-request timeout.
pub(crate) fn build_client(
    timeout: Option<std::time::Duration>,
) -> Result<reqwest::Client, UpstreamError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Strip a trailing slash so endpoint paths can be appended verbatim.
pub(crate) fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Append `segments` to the base URL. Each segment is percent-encoded, so
/// an id carrying `/`, `?` or `#` stays a single path segment.
pub(crate) fn endpoint(
    base_url: &str,
    segments: &[&str],
) -> Result<reqwest::Url, UpstreamError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| UpstreamError::InvalidUrl(format!("{base_url} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or an [`UpstreamError::Api`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Parse a successful `{ "data": ... }` response and unwrap the payload.
pub(crate) async fn parse_data<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let envelope: DataEnvelope<T> = parse_response(response).await?;
    Ok(envelope.data)
}

/// Assert the response has a success status code, discarding the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<(), UpstreamError> {
    ensure_success(response).await?;
    Ok(())
}
