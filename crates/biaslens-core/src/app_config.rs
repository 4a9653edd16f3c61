use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which web search backend the topic resolver queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProviderKind {
    DuckDuckGo,
    BingNews,
}

impl std::fmt::Display for SearchProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProviderKind::DuckDuckGo => write!(f, "duckduckgo"),
            SearchProviderKind::BingNews => write!(f, "bing"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub history_path: PathBuf,
    pub hf_api_key: String,
    pub together_api_key: String,
    pub sentiment_url: String,
    pub bias_url: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub search_provider: SearchProviderKind,
    pub topic_max_articles: usize,
    pub scraper_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub inference_timeout_secs: u64,
    pub inference_max_attempts: u32,
    pub model_loading_backoff_secs: u64,
    pub network_backoff_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("history_path", &self.history_path)
            .field("hf_api_key", &"[redacted]")
            .field("together_api_key", &"[redacted]")
            .field("sentiment_url", &self.sentiment_url)
            .field("bias_url", &self.bias_url)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("search_provider", &self.search_provider)
            .field("topic_max_articles", &self.topic_max_articles)
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("inference_timeout_secs", &self.inference_timeout_secs)
            .field("inference_max_attempts", &self.inference_max_attempts)
            .field(
                "model_loading_backoff_secs",
                &self.model_loading_backoff_secs,
            )
            .field("network_backoff_secs", &self.network_backoff_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
