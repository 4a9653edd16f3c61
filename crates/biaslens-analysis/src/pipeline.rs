use std::time::{Duration, Instant};

use biaslens_core::{AppConfig, ArticleText, InputType, DIRECT_TEXT_SOURCE};
use biaslens_inference::{ClassifierClient, GenerativeClient};
use biaslens_scraper::{build_search_provider, ContentFetcher, TopicResolver};

use crate::aggregate::aggregate;
use crate::error::AnalysisError;
use crate::signals::collect_signals;
use crate::types::{AggregatedResult, SignalResult};

/// Runs one analysis request end to end: acquire article text, collect
/// signals per article, aggregate.
pub struct Analyzer {
    fetcher: ContentFetcher,
    topics: TopicResolver,
    classifier: ClassifierClient,
    generative: GenerativeClient,
    topic_max_articles: usize,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        fetcher: ContentFetcher,
        topics: TopicResolver,
        classifier: ClassifierClient,
        generative: GenerativeClient,
        topic_max_articles: usize,
    ) -> Self {
        Self {
            fetcher,
            topics,
            classifier,
            generative,
            topic_max_articles: topic_max_articles.max(1),
        }
    }

    /// Wire up every collaborator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] if any HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        let fetcher =
            ContentFetcher::new(config.scraper_timeout_secs, &config.scraper_user_agent)?;
        let search = build_search_provider(
            config.search_provider,
            config.scraper_timeout_secs,
            &config.scraper_user_agent,
        )?;
        let topics = TopicResolver::new(
            search,
            fetcher.clone(),
            Duration::from_millis(config.scraper_inter_request_delay_ms),
        );
        Ok(Self::new(
            fetcher,
            topics,
            ClassifierClient::new(config)?,
            GenerativeClient::new(config)?,
            config.topic_max_articles,
        ))
    }

    /// Analyze `input_value` interpreted as `input_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyInput`] for blank input, and
    /// [`AnalysisError::Fetch`] / [`AnalysisError::Topic`] when article text
    /// cannot be acquired. Model failures do not error; they are recorded on
    /// the per-article results.
    pub async fn analyze(
        &self,
        input_type: InputType,
        input_value: &str,
    ) -> Result<AggregatedResult, AnalysisError> {
        if input_value.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let started = Instant::now();

        let (articles, source_display) = match input_type {
            InputType::Text => (
                vec![ArticleText::direct(input_value)],
                DIRECT_TEXT_SOURCE.to_string(),
            ),
            InputType::Url => {
                let url = input_value.trim();
                tracing::info!(url, "scraping url");
                let text = self.fetcher.fetch(url).await?;
                (vec![ArticleText::new(text, url)], url.to_string())
            }
            InputType::Topic => {
                let topic = input_value.trim();
                tracing::info!(topic, "fetching articles for topic");
                let articles = self.topics.resolve(topic, self.topic_max_articles).await?;
                let display = format!("Topic: {topic} ({} articles processed)", articles.len());
                (articles, display)
            }
        };

        let mut results: Vec<SignalResult> = Vec::with_capacity(articles.len());
        for (i, article) in articles.iter().enumerate() {
            tracing::info!(
                article = i + 1,
                total = articles.len(),
                source_url = %article.source_url,
                "analyzing article"
            );
            results.push(collect_signals(&self.classifier, &self.generative, article).await);
        }

        let aggregated = aggregate(&source_display, &results).ok_or(AnalysisError::NoResults)?;
        tracing::info!(
            input_type = %input_type,
            articles = aggregated.article_count,
            degraded = aggregated.degraded,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "analysis complete"
        );
        Ok(aggregated)
    }
}
