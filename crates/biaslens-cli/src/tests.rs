use biaslens_analysis::{aggregate, SignalResult};
use biaslens_core::{BiasLabel, CredibilityLevel, SentimentLabel};
use biaslens_history::{HistoryEntry, HistoryResults};
use biaslens_inference::{ClassifierClient, RetryPolicy, SentimentLabelMap};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::analyze::Summary;
use crate::evaluate::{parse_dataset, score_records, LabelledText};
use crate::history::{format_entry, run_history};

fn signal(url: &str, bias: BiasLabel, bias_score: u8) -> SignalResult {
    SignalResult {
        source_url: url.to_string(),
        sentiment_label: SentimentLabel::Negative,
        sentiment_score: 0,
        sentiment_confidence: 97,
        bias_label: bias,
        bias_score,
        summary: "Coverage of the budget vote.".to_string(),
        key_findings: vec!["Vote passed narrowly".to_string()],
        bias_indicators: vec![],
        credibility_assessment: "Reliable reporting with sources".to_string(),
        credibility_level: CredibilityLevel::High,
        recommended_searches: vec!["budget vote analysis".to_string()],
        error: None,
        llm_error: None,
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["biaslens"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analyze_with_flags() {
    let cli = Cli::try_parse_from([
        "biaslens",
        "analyze",
        "--type",
        "topic",
        "climate policy",
        "--json",
        "--no-history",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Analyze {
            input_type,
            value,
            json,
            no_history,
        }) => {
            assert_eq!(input_type, InputType::Topic);
            assert_eq!(value, "climate policy");
            assert!(json);
            assert!(no_history);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn analyze_rejects_unknown_type() {
    let result = Cli::try_parse_from(["biaslens", "analyze", "--type", "video", "x"]);
    assert!(result.is_err());
}

#[test]
fn analyze_type_is_required() {
    let result = Cli::try_parse_from(["biaslens", "analyze", "some text"]);
    assert!(result.is_err());
}

#[test]
fn parses_history_delete() {
    let cli = Cli::try_parse_from(["biaslens", "history", "delete", "1717000000123"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::Delete { id: 1_717_000_000_123 }
        })
    ));
}

#[test]
fn history_delete_requires_numeric_id() {
    assert!(Cli::try_parse_from(["biaslens", "history", "delete", "abc"]).is_err());
}

fn evaluate_args(args: &[&str]) -> EvaluateArgs {
    let mut argv = vec!["biaslens", "evaluate"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("expected valid cli args").command {
        Some(Commands::Evaluate(args)) => args,
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn evaluate_labels_default_to_binary_and_split_on_commas() {
    let args = evaluate_args(&["data.json"]);
    assert_eq!(args.dataset, std::path::PathBuf::from("data.json"));
    let map = args.sentiment_labels();
    assert!(map.is_empty());
    assert_eq!(args.report_labels(&map), vec!["Positive", "Negative"]);

    let args = evaluate_args(&["data.json", "--labels", "Positive,Negative,Neutral"]);
    assert_eq!(args.report_labels(&args.sentiment_labels()).len(), 3);
}

#[test]
fn cardiff_preset_maps_three_classes() {
    let args = evaluate_args(&["data.json", "--cardiff"]);
    let map = args.sentiment_labels();
    assert_eq!(map, SentimentLabelMap::cardiff());
    assert_eq!(
        args.report_labels(&map),
        vec!["Positive", "Negative", "Neutral"]
    );
}

#[test]
fn label_map_flag_is_parsed_and_validated() {
    let args = evaluate_args(&["data.json", "--label-map", "LABEL_0=negative,LABEL_1=positive"]);
    let map = args.sentiment_labels();
    assert!(!map.is_empty());
    assert_eq!(args.report_labels(&map), vec!["Positive", "Negative"]);

    assert!(Cli::try_parse_from(["biaslens", "evaluate", "d.json", "--label-map", "LABEL_0=angry"]).is_err());
    assert!(Cli::try_parse_from([
        "biaslens",
        "evaluate",
        "d.json",
        "--cardiff",
        "--label-map",
        "LABEL_0=negative"
    ])
    .is_err());
}

fn classifier_at(server: &MockServer) -> ClassifierClient {
    let url = format!("{}/sentiment", server.uri());
    ClassifierClient::with_endpoints("test-key", &url, &url, 5, RetryPolicy::immediate(1)).unwrap()
}

fn records(labels: &[&str]) -> Vec<LabelledText> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| LabelledText {
            text: format!("sample {i}"),
            label: (*label).to_string(),
        })
        .collect()
}

#[tokio::test]
async fn unmapped_labels_are_counted_as_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "LABEL_1", "score": 0.9 }
        ]])))
        .expect(2)
        .mount(&server)
        .await;

    let scored = score_records(&classifier_at(&server), &records(&["Neutral", "Positive"])).await;
    assert!(scored.pairs.is_empty());
    assert_eq!(scored.skipped, 2);
    assert!(scored.first_error.unwrap().contains("LABEL_1"));
}

#[tokio::test]
async fn cardiff_labels_are_scored_after_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "LABEL_0", "score": 0.1 },
            { "label": "LABEL_1", "score": 0.8 },
            { "label": "LABEL_2", "score": 0.1 }
        ]])))
        .mount(&server)
        .await;

    let classifier = classifier_at(&server).with_sentiment_labels(SentimentLabelMap::cardiff());
    let scored = score_records(&classifier, &records(&["Neutral"])).await;
    assert_eq!(scored.skipped, 0);
    assert_eq!(scored.pairs, vec![("Neutral".to_string(), "Neutral".to_string())]);
}

#[tokio::test]
async fn history_commands_use_only_the_store_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    run_history(&path, HistoryCommands::List).await.unwrap();
    assert!(path.exists());
    assert!(run_history(&path, HistoryCommands::Delete { id: 7 }).await.is_err());
    run_history(&path, HistoryCommands::Clear).await.unwrap();
}

#[test]
fn dataset_parsing_drops_blank_texts() {
    let raw = r#"[
        {"text": "Great news for the city", "label": "Positive"},
        {"text": "   ", "label": "Negative"},
        {"text": "Markets slump", "label": "Negative"}
    ]"#;
    let records = parse_dataset(raw).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].label, "Negative");
}

#[test]
fn dataset_must_be_an_array_of_records() {
    assert!(parse_dataset(r#"{"text": "x", "label": "Positive"}"#).is_err());
    assert!(parse_dataset(r#"[{"text": "missing label"}]"#).is_err());
}

#[test]
fn summary_lists_values_and_findings() {
    let article = signal("https://news.example/a", BiasLabel::Left, 71);
    let result = aggregate("https://news.example/a", &[article]).expect("one result aggregates");
    let text = Summary(&result).to_string();
    assert!(text.contains("Source:      https://news.example/a"));
    assert!(text.contains("Sentiment:   Negative (0)"));
    assert!(text.contains("Bias:        Left (71)"));
    assert!(text.contains("Credibility: High (85)"));
    assert!(text.contains("  - Vote passed narrowly"));
    assert!(!text.contains("Articles:"));
}

#[test]
fn history_line_shows_id_and_results() {
    let entry = HistoryEntry {
        id: 42,
        date: "2024-05-01 10:00:00".to_string(),
        input_type: InputType::Url,
        input_value: "https://news.example/a".to_string(),
        results: HistoryResults {
            bias: "Center".to_string(),
            sentiment: "Positive".to_string(),
            bias_value: 55,
            sentiment_value: 100,
        },
    };
    let line = format_entry(&entry);
    assert!(line.starts_with("42  2024-05-01 10:00:00  url"));
    assert!(line.contains("Positive (100) / Center (55)"));
    assert!(line.ends_with("https://news.example/a"));
}
