use std::sync::Arc;
use std::time::Duration;

use biaslens_core::ArticleText;

use crate::error::TopicError;
use crate::fetcher::ContentFetcher;
use crate::search::SearchProvider;

/// Search returns this many times the wanted article count, since some
/// results will fail to fetch or extract.
const OVER_FETCH_FACTOR: usize = 2;

/// Resolves a free-text topic into fetched article texts.
pub struct TopicResolver {
    search: Arc<dyn SearchProvider>,
    fetcher: ContentFetcher,
    inter_request_delay: Duration,
}

impl TopicResolver {
    #[must_use]
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: ContentFetcher,
        inter_request_delay: Duration,
    ) -> Self {
        Self {
            search,
            fetcher,
            inter_request_delay,
        }
    }

    /// Search for `topic` and fetch up to `max_articles` results sequentially.
    ///
    /// Individual fetch failures are logged and skipped. The returned list
    /// keeps search rank order.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::Search`] if the search backend fails, or
    /// [`TopicError::NoArticles`] when no result produced usable text.
    pub async fn resolve(
        &self,
        topic: &str,
        max_articles: usize,
    ) -> Result<Vec<ArticleText>, TopicError> {
        let candidates = self
            .search
            .search(topic, max_articles.saturating_mul(OVER_FETCH_FACTOR))
            .await?;
        tracing::info!(
            provider = self.search.name(),
            topic,
            candidates = candidates.len(),
            "topic search complete"
        );

        let mut articles = Vec::with_capacity(max_articles);
        for (i, url) in candidates.iter().enumerate() {
            if articles.len() >= max_articles {
                break;
            }
            if i > 0 && !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }
            match self.fetcher.fetch(url).await {
                Ok(text) => articles.push(ArticleText::new(text, url.clone())),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "skipping topic result");
                }
            }
        }

        if articles.is_empty() {
            return Err(TopicError::NoArticles {
                topic: topic.to_string(),
            });
        }
        tracing::info!(topic, articles = articles.len(), "topic resolved");
        Ok(articles)
    }
}
