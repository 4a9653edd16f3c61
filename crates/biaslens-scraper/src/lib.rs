//! Article acquisition for BiasLens.
//!
//! Fetches a URL and guesses which DOM subtree holds the article body, or
//! resolves a free-text topic into a handful of fetched articles via a web
//! search provider.

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod search;
pub mod topic;

pub use error::{FetchError, SearchError, TopicError};
pub use extract::extract_article_text;
pub use fetcher::{normalize_url, ContentFetcher};
pub use search::{build_search_provider, BingNewsSearch, DuckDuckGoSearch, SearchProvider};
pub use topic::TopicResolver;
