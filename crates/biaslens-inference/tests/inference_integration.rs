use biaslens_core::{BiasLabel, SentimentLabel};
use biaslens_inference::{
    ClassifierClient, GenerationError, GenerativeClient, InferenceError, RetryPolicy,
    SentimentLabelMap,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

fn classifier(server: &MockServer) -> ClassifierClient {
    ClassifierClient::with_endpoints(
        KEY,
        &format!("{}/sentiment", server.uri()),
        &format!("{}/bias", server.uri()),
        5,
        RetryPolicy::immediate(4),
    )
    .unwrap()
}

fn generative(server: &MockServer) -> GenerativeClient {
    GenerativeClient::with_base_url(KEY, &server.uri(), "test-model", 5, RetryPolicy::immediate(4))
        .unwrap()
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn sentiment_recovers_after_three_loading_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .with_priority(1)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "POSITIVE", "score": 0.93 },
            { "label": "NEGATIVE", "score": 0.07 }
        ]])))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let signal = classifier(&server)
        .classify_sentiment("Great news for the city.")
        .await
        .unwrap();
    assert_eq!(signal.label, SentimentLabel::Positive);
    assert_eq!(signal.score, 100);
    assert_eq!(signal.confidence, 93);
}

#[tokio::test]
async fn sentiment_reports_unavailable_after_four_loading_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model is currently loading", "estimated_time": 20.0
        })))
        .expect(4)
        .mount(&server)
        .await;

    let err = classifier(&server)
        .classify_sentiment("anything")
        .await
        .unwrap_err();
    assert!(matches!(err, InferenceError::Unavailable { attempts: 4, .. }));
}

#[tokio::test]
async fn client_error_status_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bias"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad inputs"))
        .expect(1)
        .mount(&server)
        .await;

    let err = classifier(&server).classify_bias("anything").await.unwrap_err();
    match err {
        InferenceError::Status { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad inputs");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn bias_labels_are_normalized_and_scored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "LEFT", "score": 0.625 },
            { "label": "CENTER", "score": 0.25 },
            { "label": "RIGHT", "score": 0.125 }
        ]])))
        .mount(&server)
        .await;

    let signal = classifier(&server).classify_bias("text").await.unwrap();
    assert_eq!(signal.label, BiasLabel::Left);
    assert_eq!(signal.score, 63);
}

#[tokio::test]
async fn classifier_input_is_truncated() {
    let server = MockServer::start().await;
    let long_text = "a".repeat(1500);
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .and(body_partial_json(json!({ "inputs": "a".repeat(1000) })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "NEGATIVE", "score": 0.8 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let signal = classifier(&server)
        .classify_sentiment(&long_text)
        .await
        .unwrap();
    assert_eq!(signal.label, SentimentLabel::Negative);
    assert_eq!(signal.score, 0);
}

#[tokio::test]
async fn unknown_sentiment_label_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "LABEL_2", "score": 0.8 }
        ]])))
        .mount(&server)
        .await;

    let err = classifier(&server).classify_sentiment("x").await.unwrap_err();
    assert!(matches!(err, InferenceError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn three_class_labels_resolve_through_label_map() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "LABEL_1", "score": 0.8 },
            { "label": "LABEL_2", "score": 0.15 },
            { "label": "LABEL_0", "score": 0.05 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let signal = classifier(&server)
        .with_sentiment_labels(SentimentLabelMap::cardiff())
        .classify_sentiment("The council met on Tuesday.")
        .await
        .unwrap();
    assert_eq!(signal.label, SentimentLabel::Neutral);
    assert_eq!(signal.score, 50);
    assert_eq!(signal.confidence, 80);
}

#[tokio::test]
async fn generative_report_parses_prose_wrapped_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "temperature": 0.3,
            "max_tokens": 1024
        })))
        .respond_with(chat_reply(
            "Here you go:\n{\"summary\":\"A short summary.\",\"key_findings\":[\"one\"],\
             \"bias_indicators_llm\":[],\"credibility_assessment\":\"Appears credible\",\
             \"recommended_searches\":[\"a\",\"b\"]}\nThanks!",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let report = generative(&server).generate_report("text").await.unwrap();
    assert_eq!(report.summary, "A short summary.");
    assert_eq!(report.key_findings, vec!["one"]);
    assert_eq!(report.recommended_searches, vec!["a", "b"]);
}

#[tokio::test]
async fn generative_missing_fields_surface_as_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(chat_reply(
            "Analysis: {\"summary\":\"s\",\"credibility_assessment\":\"c\"}",
        ))
        .mount(&server)
        .await;

    let err = generative(&server).generate_report("text").await.unwrap_err();
    assert!(matches!(
        err,
        InferenceError::Generation(GenerationError::MissingFields(ref keys)) if keys == &["key_findings"]
    ));
}
