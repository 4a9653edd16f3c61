use crate::app_config::{AppConfig, Environment, SearchProviderKind};
use crate::ConfigError;

pub const DEFAULT_SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/siebert/sentiment-roberta-large-english";
pub const DEFAULT_BIAS_URL: &str =
    "https://api-inference.huggingface.co/models/bucketresearch/politicalBiasBERT";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.together.xyz";
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HISTORY_PATH: &str = "static/data/history.json";

/// Politeness floor between article fetches during topic resolution.
pub const MIN_INTER_REQUEST_DELAY_MS: u64 = 500;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// The slice of configuration that commands touching only the history file
/// need. Unlike [`AppConfig`], it requires no API keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub log_level: String,
    pub history_path: std::path::PathBuf,
}

/// Load [`HistoryConfig`] from the environment, after loading `.env`.
#[must_use]
pub fn load_history_config() -> HistoryConfig {
    dotenvy::dotenv().ok();
    build_history_config(|key| std::env::var(key))
}

fn build_history_config<F>(lookup: F) -> HistoryConfig
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());
    HistoryConfig {
        log_level: or_default("BIASLENS_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        history_path: or_default("BIASLENS_HISTORY_PATH", DEFAULT_HISTORY_PATH).into(),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let hf_api_key = require("HF_API_KEY")?;
    let together_api_key = require("TOGETHER_API_KEY")?;

    let env = parse_environment(&or_default("BIASLENS_ENV", "development"));

    let bind_addr = or_default("BIASLENS_BIND_ADDR", "0.0.0.0:8080")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BIASLENS_BIND_ADDR", e.to_string()))?;
    let HistoryConfig {
        log_level,
        history_path,
    } = build_history_config(&lookup);

    let sentiment_url = or_default("BIASLENS_SENTIMENT_URL", DEFAULT_SENTIMENT_URL);
    let bias_url = or_default("BIASLENS_BIAS_URL", DEFAULT_BIAS_URL);
    let llm_base_url = or_default("BIASLENS_LLM_BASE_URL", DEFAULT_LLM_BASE_URL);
    let llm_model = or_default("BIASLENS_LLM_MODEL", DEFAULT_LLM_MODEL);

    let search_provider =
        parse_search_provider(&or_default("BIASLENS_SEARCH_PROVIDER", "duckduckgo"))?;
    let topic_max_articles = parse_usize("BIASLENS_TOPIC_MAX_ARTICLES", "3")?;
    if topic_max_articles == 0 {
        return Err(invalid(
            "BIASLENS_TOPIC_MAX_ARTICLES",
            "must be at least 1".to_string(),
        ));
    }

    let scraper_timeout_secs = parse_u64("BIASLENS_SCRAPER_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("BIASLENS_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_inter_request_delay_ms =
        parse_u64("BIASLENS_SCRAPER_INTER_REQUEST_DELAY_MS", "1000")?;
    if scraper_inter_request_delay_ms < MIN_INTER_REQUEST_DELAY_MS {
        return Err(invalid(
            "BIASLENS_SCRAPER_INTER_REQUEST_DELAY_MS",
            format!("must be at least {MIN_INTER_REQUEST_DELAY_MS} ms"),
        ));
    }

    let inference_timeout_secs = parse_u64("BIASLENS_INFERENCE_TIMEOUT_SECS", "30")?;
    let inference_max_attempts = parse_u32("BIASLENS_INFERENCE_MAX_ATTEMPTS", "4")?;
    if inference_max_attempts == 0 {
        return Err(invalid(
            "BIASLENS_INFERENCE_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let model_loading_backoff_secs = parse_u64("BIASLENS_MODEL_LOADING_BACKOFF_SECS", "5")?;
    let network_backoff_secs = parse_u64("BIASLENS_NETWORK_BACKOFF_SECS", "2")?;
    let rate_limit_per_minute = parse_usize("BIASLENS_RATE_LIMIT_PER_MINUTE", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        history_path,
        hf_api_key,
        together_api_key,
        sentiment_url,
        bias_url,
        llm_base_url,
        llm_model,
        search_provider,
        topic_max_articles,
        scraper_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        inference_timeout_secs,
        inference_max_attempts,
        model_loading_backoff_secs,
        network_backoff_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_search_provider(s: &str) -> Result<SearchProviderKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "duckduckgo" | "ddg" => Ok(SearchProviderKind::DuckDuckGo),
        "bing" | "bing_news" => Ok(SearchProviderKind::BingNews),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BIASLENS_SEARCH_PROVIDER".to_string(),
            reason: format!("unknown provider \"{other}\" (expected duckduckgo or bing)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("HF_API_KEY", "hf-test-key");
        m.insert("TOGETHER_API_KEY", "together-test-key");
        m
    }

    #[test]
    fn history_config_needs_no_api_keys() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_history_config(lookup_from_map(&map));
        assert_eq!(cfg.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(cfg.history_path, std::path::PathBuf::from(DEFAULT_HISTORY_PATH));

        let mut map = HashMap::new();
        map.insert("BIASLENS_HISTORY_PATH", "/tmp/h.json");
        map.insert("BIASLENS_LOG_LEVEL", "debug");
        let cfg = build_history_config(lookup_from_map(&map));
        assert_eq!(cfg.history_path, std::path::PathBuf::from("/tmp/h.json"));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_hf_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "HF_API_KEY"),
            "expected MissingEnvVar(HF_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_treats_blank_key_as_missing() {
        let mut map = full_env();
        map.insert("TOGETHER_API_KEY", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TOGETHER_API_KEY"),
            "expected MissingEnvVar(TOGETHER_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(
            cfg.history_path,
            std::path::PathBuf::from("static/data/history.json")
        );
        assert_eq!(cfg.sentiment_url, DEFAULT_SENTIMENT_URL);
        assert_eq!(cfg.bias_url, DEFAULT_BIAS_URL);
        assert_eq!(cfg.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(cfg.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(cfg.search_provider, SearchProviderKind::DuckDuckGo);
        assert_eq!(cfg.topic_max_articles, 3);
        assert_eq!(cfg.scraper_timeout_secs, 15);
        assert_eq!(cfg.scraper_inter_request_delay_ms, 1000);
        assert_eq!(cfg.inference_timeout_secs, 30);
        assert_eq!(cfg.inference_max_attempts, 4);
        assert_eq!(cfg.model_loading_backoff_secs, 5);
        assert_eq!(cfg.network_backoff_secs, 2);
        assert_eq!(cfg.rate_limit_per_minute, 30);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("BIASLENS_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIASLENS_BIND_ADDR"),
            "expected InvalidEnvVar(BIASLENS_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_selects_bing_provider() {
        let mut map = full_env();
        map.insert("BIASLENS_SEARCH_PROVIDER", "Bing");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.search_provider, SearchProviderKind::BingNews);
    }

    #[test]
    fn build_app_config_rejects_unknown_provider() {
        let mut map = full_env();
        map.insert("BIASLENS_SEARCH_PROVIDER", "altavista");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIASLENS_SEARCH_PROVIDER"),
            "expected InvalidEnvVar(BIASLENS_SEARCH_PROVIDER), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_delay_below_politeness_floor() {
        let mut map = full_env();
        map.insert("BIASLENS_SCRAPER_INTER_REQUEST_DELAY_MS", "100");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIASLENS_SCRAPER_INTER_REQUEST_DELAY_MS"),
            "expected InvalidEnvVar for the delay, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_attempts() {
        let mut map = full_env();
        map.insert("BIASLENS_INFERENCE_MAX_ATTEMPTS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIASLENS_INFERENCE_MAX_ATTEMPTS"
        ));
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = full_env();
        map.insert("BIASLENS_SCRAPER_TIMEOUT_SECS", "fifteen");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIASLENS_SCRAPER_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn debug_output_redacts_api_keys() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hf-test-key"));
        assert!(!rendered.contains("together-test-key"));
        assert!(rendered.contains("[redacted]"));
    }
}
