mod analyze;
mod evaluate;
mod history;

use biaslens_core::{AppConfig, InputType};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::evaluate::EvaluateArgs;
use crate::history::HistoryCommands;

#[derive(Debug, Parser)]
#[command(name = "biaslens")]
#[command(about = "News bias, sentiment, and credibility analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a piece of text, an article URL, or a news topic
    Analyze {
        /// What VALUE is: text, url, or topic
        #[arg(long = "type", value_name = "TYPE", value_parser = parse_input_type)]
        input_type: InputType,

        /// Text, URL, or topic to analyze
        value: String,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Do not record the analysis in history
        #[arg(long)]
        no_history: bool,
    },
    /// Inspect or edit the analysis history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Score the sentiment classifier against a labelled JSON dataset
    Evaluate(EvaluateArgs),
}

fn parse_input_type(raw: &str) -> Result<InputType, String> {
    InputType::parse(raw).ok_or_else(|| format!("expected one of text, url, topic; got '{raw}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("biaslens: run with --help for available commands");
        return Ok(());
    };

    match command {
        Commands::Analyze {
            input_type,
            value,
            json,
            no_history,
        } => {
            let config = load_config()?;
            analyze::run_analyze(&config, input_type, &value, json, no_history).await
        }
        Commands::History { command } => {
            let config = biaslens_core::load_history_config();
            init_tracing(&config.log_level)?;
            history::run_history(&config.history_path, command).await
        }
        Commands::Evaluate(args) => {
            let config = load_config()?;
            evaluate::run_evaluate(&config, &args).await
        }
    }
}

/// Full configuration, for commands that call the remote models.
fn load_config() -> anyhow::Result<AppConfig> {
    let config = biaslens_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    Ok(config)
}

fn init_tracing(fallback_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests;
