//! DuckDuckGo HTML-endpoint search.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use scraper::{Html, Selector};

use super::{collect_unique, SearchProvider};
use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

/// Scrapes the JavaScript-free DuckDuckGo results page.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Point at a different host, e.g. a mock server in tests.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/html/?q={encoded}", self.base_url);
        tracing::debug!(provider = self.name(), query, "searching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                provider: self.name(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(parse_results(&body, max_results))
    }
}

/// Pull result links out of a DuckDuckGo HTML results page.
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a.result__a") else {
        return Vec::new();
    };
    let hrefs = document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_href);
    collect_unique(hrefs, max_results)
}

/// Result links are usually redirect wrappers (`//duckduckgo.com/l/?uddg=<target>`);
/// unwrap them to the target URL.
fn resolve_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;
    let is_redirect = parsed
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"));
    if !is_redirect {
        return Some(absolute);
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
}
