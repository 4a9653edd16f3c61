//! Per-article signal collection and multi-article aggregation.
//!
//! [`Analyzer`] ties acquisition (scraper) and the model clients (inference)
//! together: it turns one request into a list of [`SignalResult`]s and folds
//! them into a single [`AggregatedResult`].

pub mod aggregate;
pub mod credibility;
pub mod error;
pub mod evaluation;
pub mod pipeline;
pub mod signals;
pub mod types;

pub use aggregate::aggregate;
pub use credibility::map_credibility;
pub use error::AnalysisError;
pub use evaluation::{evaluate, ClassMetrics, EvaluationReport};
pub use pipeline::Analyzer;
pub use signals::collect_signals;
pub use types::{
    AggregatedResult, ArticleDetail, BiasDistribution, MergedAnalysis, SentimentDistribution,
    SignalResult, VisualizationData,
};
