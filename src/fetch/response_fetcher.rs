//! Executes a single PSM3 download request and classifies the outcome.

use crate::config::Config;
use crate::fetch::envelope::{looks_like_json, ResponseEnvelope};
use crate::fetch::error::FetchError;
use crate::parse::csv_table_parser::DEFAULT_PREAMBLE_LINES;
use crate::parse::raw_table::RawTable;
use crate::utils::{redact_url, snippet};
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::time::Duration;

/// Longest body excerpt kept in a [`FetchError::RequestRejected`].
const BODY_SNIPPET_CHARS: usize = 512;

/// Performs exactly one blocking GET per [`ResponseFetcher::fetch`] call.
///
/// There is no retry, backoff or caching. A caller that wants retries layers them
/// above this type.
pub struct ResponseFetcher {
    client: Client,
    min_lines: usize,
}

impl ResponseFetcher {
    /// Creates a fetcher whose requests give up after `timeout` (no limit when `None`).
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            min_lines: DEFAULT_PREAMBLE_LINES + 1,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.timeout())
    }

    /// Downloads `url` and returns the CSV body.
    ///
    /// # Errors
    ///
    /// * [`FetchError::FetchFailed`]: connection, DNS, TLS or timeout failure, or the body
    ///   could not be read.
    /// * [`FetchError::RequestRejected`]: any non-2xx status; carries the code, reason and a
    ///   body excerpt.
    /// * [`FetchError::DeferredResult`]: the provider answered with a job envelope holding
    ///   a `downloadUrl` instead of inline data.
    /// * [`FetchError::MalformedResponse`]: a 2xx response that is empty, not CSV, or too
    ///   short to contain a header.
    pub fn fetch(&self, url: &Url) -> Result<RawTable, FetchError> {
        let shown = redact_url(url);
        info!("Requesting {}", shown);

        let response = self.client.get(url.clone()).send().map_err(|e| {
            let source = e.without_url();
            warn!("Request to {} failed: {}", shown, source);
            FetchError::FetchFailed {
                url: shown.clone(),
                source,
            }
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(|e| FetchError::FetchFailed {
            url: shown.clone(),
            source: e.without_url(),
        })?;
        info!(
            "Received HTTP {} with {} bytes from {}",
            status.as_u16(),
            body.len(),
            shown
        );

        self.classify(status, content_type.as_deref(), body, &shown)
    }

    pub(crate) fn classify(
        &self,
        status: StatusCode,
        content_type: Option<&str>,
        body: String,
        shown_url: &str,
    ) -> Result<RawTable, FetchError> {
        let malformed = |reason: String| FetchError::MalformedResponse {
            url: shown_url.to_string(),
            reason,
        };

        if !status.is_success() {
            let detail = ResponseEnvelope::parse(&body)
                .ok()
                .and_then(|envelope| envelope.error_summary())
                .unwrap_or_else(|| body.clone());
            let body = snippet(&detail, BODY_SNIPPET_CHARS);
            warn!("HTTP {} from {}: {}", status.as_u16(), shown_url, body);
            return Err(FetchError::RequestRejected {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: if body.is_empty() {
                    "<empty body>".to_string()
                } else {
                    body
                },
            });
        }

        if body.trim().is_empty() {
            return Err(malformed("empty body".to_string()));
        }

        if looks_like_json(content_type, &body) {
            let envelope = ResponseEnvelope::parse(&body)
                .map_err(|e| malformed(format!("invalid JSON body: {e}")))?;
            if let Some(download_url) = envelope.download_url() {
                let message = envelope.message().unwrap_or("no message").to_string();
                info!("Provider deferred the request: {}", message);
                return Err(FetchError::DeferredResult {
                    download_url: download_url.to_string(),
                    message,
                });
            }
            let reason = match envelope.error_summary() {
                Some(errors) => format!("provider reported errors: {errors}"),
                None => "JSON body without CSV data or a downloadUrl".to_string(),
            };
            return Err(malformed(reason));
        }

        if body.trim_start().starts_with('<') {
            return Err(malformed(format!(
                "expected CSV but got markup: {}",
                snippet(&body, 80)
            )));
        }

        let table = RawTable::new(body);
        if table.line_count() < self.min_lines {
            return Err(malformed(format!(
                "expected at least {} lines, got {}",
                self.min_lines,
                table.line_count()
            )));
        }
        Ok(table)
    }
}
