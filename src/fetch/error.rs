use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {url}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request rejected with HTTP {code} {reason}: {body}")]
    RequestRejected {
        code: u16,
        reason: String,
        body: String,
    },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Provider queued the request as a background job ({message}); download it from {download_url}")]
    DeferredResult {
        download_url: String,
        message: String,
    },
}

impl FetchError {
    /// HTTP status code, for the variants that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::RequestRejected { code, .. } => Some(*code),
            FetchError::FetchFailed { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
