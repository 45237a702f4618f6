//! URL canonicalization for fetches and redirect detection.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string before it goes on the wire.
///
/// Trims whitespace, defaults the scheme to https, lowercases the host and
/// drops the fragment. The query string is kept verbatim since icon URLs
/// often carry cache-busting parameters.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether a fetch for `requested` ended somewhere else.
///
/// Both sides are compared in canonical form so that a trailing slash or
/// host casing never looks like a redirect.
pub fn was_redirected(requested: &url::Url, final_url: &url::Url) -> bool {
    match (canonicalize(requested.as_str()), canonicalize(final_url.as_str())) {
        (Ok(a), Ok(b)) => a != b,
        _ => requested != final_url,
    }
}
