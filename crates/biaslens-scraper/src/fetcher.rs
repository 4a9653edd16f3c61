use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::extract::extract_article_text;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Downloads article pages and runs main-content extraction on them.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetch `raw_url` and return the extracted article text.
    ///
    /// A missing scheme defaults to `https://`. A response without a
    /// `Content-Type` header is treated as HTML.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for malformed URLs, transport failures,
    /// non-2xx statuses, non-HTML bodies, or pages with no extractable text.
    pub async fn fetch(&self, raw_url: &str) -> Result<String, FetchError> {
        let url = normalize_url(raw_url)?;
        let url_str = url.to_string();
        tracing::debug!(url = %url_str, "fetching article page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url_str,
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::WrongContentType {
                    url: url_str,
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                url: url_str.clone(),
                source,
            })?;

        let text = extract_article_text(&body).ok_or_else(|| FetchError::NoContent {
            url: url_str.clone(),
        })?;
        tracing::info!(url = %url_str, chars = text.chars().count(), "extracted article text");
        Ok(text)
    }
}

/// Trim the input, prepend `https://` when no scheme is given, and require an
/// http(s) URL with a host.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if the result does not parse or uses
/// another scheme.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };
    if trimmed.is_empty() {
        return Err(invalid("empty URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn is_html(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/html") || lower.contains("application/xhtml+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_https_scheme() {
        let url = normalize_url("  example.com/news/story  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/news/story");
    }

    #[test]
    fn explicit_http_scheme_is_kept() {
        let url = normalize_url("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = normalize_url("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(
            normalize_url("   "),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn html_content_types_are_recognized() {
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/pdf"));
        assert!(!is_html("application/json"));
    }
}
