//! JSON bodies the provider sends instead of CSV: job envelopes and error reports.

use serde::Deserialize;

/// Envelope returned by the asynchronous PSM3 flow and by most error responses.
///
/// ```json
/// {"inputs": {...}, "outputs": {"message": "File generation in progress...",
///  "downloadUrl": "https://..."}, "errors": []}
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResponseEnvelope {
    pub outputs: Option<EnvelopeOutputs>,
    pub errors: Vec<String>,
    /// api.data.gov gateway errors (invalid or missing key, rate limit).
    pub error: Option<GatewayError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct EnvelopeOutputs {
    pub message: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GatewayError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ResponseEnvelope {
    pub(crate) fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Download URL of a deferred job, when the provider queued one.
    pub(crate) fn download_url(&self) -> Option<&str> {
        self.outputs
            .as_ref()
            .and_then(|o| o.download_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    pub(crate) fn message(&self) -> Option<&str> {
        self.outputs.as_ref().and_then(|o| o.message.as_deref())
    }

    /// All error messages the body reports, joined with `"; "`. `None` when there are none.
    pub(crate) fn error_summary(&self) -> Option<String> {
        let mut messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if let Some(gateway) = &self.error {
            match (&gateway.code, &gateway.message) {
                (Some(code), Some(message)) => messages.push(format!("{code}: {message}")),
                (None, Some(message)) => messages.push(message.clone()),
                (Some(code), None) => messages.push(code.clone()),
                (None, None) => {}
            }
        }
        (!messages.is_empty()).then(|| messages.join("; "))
    }
}

/// Returns `true` when the body should be treated as JSON rather than CSV.
pub(crate) fn looks_like_json(content_type: Option<&str>, body: &str) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
        || body.trim_start().starts_with('{')
}
