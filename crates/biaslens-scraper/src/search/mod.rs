//! Web search backends used to turn a topic into candidate article URLs.

mod bing;
mod duckduckgo;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use biaslens_core::SearchProviderKind;
use reqwest::Client;

use crate::error::SearchError;

pub use bing::BingNewsSearch;
pub use duckduckgo::DuckDuckGoSearch;

/// A web search backend that returns candidate result URLs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Return at most `max_results` absolute http(s) result URLs, in rank order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError>;
}

/// Build the configured provider with a shared HTTP client.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the HTTP client cannot be built.
pub fn build_search_provider(
    kind: SearchProviderKind,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<Arc<dyn SearchProvider>, SearchError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()?;
    let provider: Arc<dyn SearchProvider> = match kind {
        SearchProviderKind::DuckDuckGo => Arc::new(DuckDuckGoSearch::new(client)),
        SearchProviderKind::BingNews => Arc::new(BingNewsSearch::new(client)),
    };
    Ok(provider)
}

/// Keep absolute http(s) URLs only, drop repeats, preserve order, cap at `max`.
pub(crate) fn collect_unique(urls: impl IntoIterator<Item = String>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for url in urls {
        if out.len() >= max {
            break;
        }
        let is_web = url.starts_with("http://") || url.starts_with("https://");
        if is_web && !out.contains(&url) {
            out.push(url);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_unique_filters_and_caps() {
        let urls = vec![
            "https://a.example/1".to_string(),
            "javascript:void(0)".to_string(),
            "https://a.example/1".to_string(),
            "http://b.example/2".to_string(),
            "https://c.example/3".to_string(),
        ];
        assert_eq!(
            collect_unique(urls, 2),
            vec!["https://a.example/1", "http://b.example/2"]
        );
    }
}
