use std::fmt;

use biaslens_analysis::{AggregatedResult, Analyzer};
use biaslens_core::{AppConfig, InputType};
use biaslens_history::{HistoryEntry, HistoryStore};

/// Run one analysis and print it.
///
/// A history write failure is reported on stderr but does not fail the run.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or the analysis fails.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    input_type: InputType,
    value: &str,
    json: bool,
    no_history: bool,
) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config)?;
    let result = analyzer.analyze(input_type, value).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", Summary(&result));
    }

    if !no_history {
        let store = HistoryStore::new(config.history_path.clone());
        let entry = HistoryEntry::from_result(input_type, value, &result);
        match store.append(entry).await {
            Ok(stored) => tracing::debug!(id = stored.id, "analysis recorded in history"),
            Err(e) => eprintln!("warning: could not record history: {e}"),
        }
    }

    Ok(())
}

/// Human-readable rendering of an [`AggregatedResult`].
pub(crate) struct Summary<'a>(pub &'a AggregatedResult);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Source:      {}", result.source_display)?;
        writeln!(f, "Sentiment:   {} ({})", result.sentiment, result.sentiment_value)?;
        writeln!(f, "Bias:        {} ({})", result.bias, result.bias_value)?;
        writeln!(
            f,
            "Credibility: {} ({})",
            result.credibility_level, result.credibility_value
        )?;
        if result.article_count > 1 {
            writeln!(f, "Articles:    {}", result.article_count)?;
        }
        if result.degraded {
            writeln!(f, "Note:        no article produced valid signals; values are defaults")?;
        }
        writeln!(f, "\n{}", result.summary)?;

        write_list(f, "Key findings", &result.analysis.key_findings)?;
        write_list(f, "Recommended searches", &result.analysis.recommended_searches)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{title}:")?;
    for item in items {
        writeln!(f, "  - {item}")?;
    }
    Ok(())
}
