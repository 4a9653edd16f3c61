pub mod app_config;
pub mod config;
pub mod labels;
pub mod types;

pub use app_config::{AppConfig, Environment, SearchProviderKind};
pub use config::{load_app_config, load_app_config_from_env, load_history_config, HistoryConfig};
pub use labels::{BiasLabel, CredibilityLevel, SentimentLabel};
pub use types::{ArticleText, InputType, DIRECT_TEXT_SOURCE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
