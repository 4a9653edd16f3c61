use thiserror::Error;

/// Failures while fetching a single article page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("{url} returned non-HTML content ({content_type})")]
    WrongContentType { url: String, content_type: String },

    #[error("no extractable article content found at {url}")]
    NoContent { url: String },
}

/// Failures from a web search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} search returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("search feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Failures while turning a topic into articles.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("search for topic failed: {0}")]
    Search(#[from] SearchError),

    #[error("could not successfully get content for any articles for topic: {topic}")]
    NoArticles { topic: String },
}
