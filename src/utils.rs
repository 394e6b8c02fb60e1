use reqwest::Url;

const REDACTED: &str = "REDACTED";
const SECRET_PARAMS: [&str; 1] = ["api_key"];

/// Renders a URL with secret query parameters replaced, for logs and error messages.
pub(crate) fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SECRET_PARAMS.contains(&k.as_ref()) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Truncates `text` to at most `max_chars` characters, marking the cut with `...`.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_api_key() {
        let url = Url::parse("https://example.com/data.csv?email=a%40b.c&api_key=s3cret&year=2020")
            .unwrap();
        let shown = redact_url(&url);
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("api_key=REDACTED"));
        assert!(shown.contains("year=2020"));
    }

    #[test]
    fn test_redact_without_query() {
        let url = Url::parse("https://example.com/data.csv").unwrap();
        assert_eq!(redact_url(&url), "https://example.com/data.csv");
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("  short  ", 10), "short");
        assert_eq!(snippet("abcdefgh", 3), "abc...");
        assert_eq!(snippet("ééééé", 2), "éé...");
    }
}
