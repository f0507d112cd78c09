/// Errors from calling an upstream service.
///
/// Every variant means the service is unavailable for this call; callers
/// either propagate it or, for background reconciliation, log and retry.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, timeout, undecodable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body decoded but did not carry what the contract promises.
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// The configured base URL cannot be turned into a request URL.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}
