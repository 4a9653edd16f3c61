use std::sync::LazyLock;
use std::time::Duration;

use biaslens_core::AppConfig;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GenerationError, InferenceError};
use crate::retry::RetryPolicy;
use crate::types::GenerativeReport;

/// Generative inputs are cut to this many characters.
pub const MAX_GENERATIVE_INPUT_CHARS: usize = 8000;

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1024;

const REQUIRED_FIELDS: [&str; 3] = ["summary", "key_findings", "credibility_assessment"];

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex"));

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    retry: RetryPolicy,
}

impl GenerativeClient {
    /// # Errors
    ///
    /// Returns [`InferenceError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, InferenceError> {
        Self::with_base_url(
            &config.together_api_key,
            &config.llm_base_url,
            &config.llm_model,
            config.inference_timeout_secs,
            RetryPolicy::from_config(config),
        )
    }

    /// # Errors
    ///
    /// Returns [`InferenceError::Client`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(InferenceError::Client)?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            retry,
        })
    }

    /// Ask the model for a structured report on `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] on transport failure or exhausted
    /// retries, or [`InferenceError::Generation`] when the reply does not hold
    /// a usable JSON report.
    pub async fn generate_report(&self, text: &str) -> Result<GenerativeReport, InferenceError> {
        let char_count = text.chars().count();
        if char_count > MAX_GENERATIVE_INPUT_CHARS {
            tracing::debug!(
                chars = char_count,
                max = MAX_GENERATIVE_INPUT_CHARS,
                "truncating generative input"
            );
        }
        let prompt = build_prompt(crate::truncate_chars(text, MAX_GENERATIVE_INPUT_CHARS));
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let body = self
            .retry
            .run(&self.endpoint, || {
                crate::http::post_json(&self.client, &self.endpoint, &self.api_key, &request)
            })
            .await?;

        let response: ChatResponse =
            serde_json::from_str(&body).map_err(|source| InferenceError::Deserialize {
                context: "chat completion response".to_string(),
                source,
            })?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                InferenceError::UnexpectedResponse("chat completion had no content".to_string())
            })?;

        tracing::debug!(model = %self.model, chars = content.len(), "generative response received");
        Ok(parse_report(&content)?)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following text. Provide the output STRICTLY in JSON format with the specified keys.

Text to analyze:
--- START TEXT ---
{text}
--- END TEXT ---

Requested JSON output structure:
{{
  "summary": "A concise, neutral summary of the text in 3-5 sentences.",
  "key_findings": ["3-5 key points or conclusions from the text"],
  "bias_indicators_llm": ["2-4 specific phrases or arguments that suggest a potential bias, without classifying the bias"],
  "credibility_assessment": "A brief assessment such as 'Appears credible', 'Lacks sourcing', 'Uses emotionally charged language' or 'Presents multiple viewpoints', with a short justification.",
  "recommended_searches": ["3 related search terms for further exploration"]
}}

Instructions:
- Analyze the text based ONLY on the provided content.
- Use exactly the keys above.
- If a field cannot be determined, use "N/A" or an empty list.
- Keep the summary neutral and objective.

Provide ONLY the JSON output, without introductory text, explanations, or markdown formatting."#
    )
}

/// Extract a [`GenerativeReport`] from raw model output.
///
/// `<think>...</think>` blocks are removed, then the span from the first `{`
/// to the last `}` is parsed. Optional list fields default to empty and
/// non-string list items are skipped.
///
/// # Errors
///
/// Returns [`GenerationError::NoJsonFound`] if there is no brace-delimited
/// span, [`GenerationError::InvalidJson`] if it does not parse as a JSON
/// object, and [`GenerationError::MissingFields`] if a required key is absent.
pub fn parse_report(raw: &str) -> Result<GenerativeReport, GenerationError> {
    let cleaned = THINK_RE.replace_all(raw, "");

    let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        return Err(GenerationError::NoJsonFound);
    };
    if end < start {
        return Err(GenerationError::NoJsonFound);
    }

    let value: Value = serde_json::from_str(&cleaned[start..=end])
        .map_err(|e| GenerationError::InvalidJson(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(GenerationError::InvalidJson(
            "expected a JSON object".to_string(),
        ));
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|key| !fields.contains_key(**key))
        .map(|key| (*key).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(GenerationError::MissingFields(missing));
    }

    Ok(GenerativeReport {
        summary: text_field(&fields, "summary"),
        key_findings: string_list(&fields, "key_findings"),
        bias_indicators: string_list(&fields, "bias_indicators_llm"),
        credibility_assessment: text_field(&fields, "credibility_assessment"),
        recommended_searches: string_list(&fields, "recommended_searches"),
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "summary": "Council approves budget.",
        "key_findings": ["Vote passed 7-2", 42, "Transit funding rises"],
        "bias_indicators_llm": ["\"reckless spending\""],
        "credibility_assessment": "Appears credible, cites officials.",
        "recommended_searches": ["city budget", "transit funding"]
    }"#;

    #[test]
    fn parses_report_wrapped_in_prose() {
        let raw = format!("Sure! Here is the analysis:\n{FULL}\nLet me know if you need more.");
        let report = parse_report(&raw).unwrap();
        assert_eq!(report.summary, "Council approves budget.");
        assert_eq!(
            report.key_findings,
            vec!["Vote passed 7-2", "Transit funding rises"]
        );
        assert_eq!(report.bias_indicators.len(), 1);
        assert_eq!(report.recommended_searches.len(), 2);
    }

    #[test]
    fn think_blocks_are_removed_before_parsing() {
        let raw = format!("<think>maybe {{ \"draft\": true }} then</think>{FULL}");
        let report = parse_report(&raw).unwrap();
        assert_eq!(report.summary, "Council approves budget.");
    }

    #[test]
    fn optional_lists_default_to_empty() {
        let raw = r#"{"summary":"s","key_findings":[],"credibility_assessment":"c"}"#;
        let report = parse_report(raw).unwrap();
        assert!(report.bias_indicators.is_empty());
        assert!(report.recommended_searches.is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let raw = r#"Result: {"summary":"s","bias_indicators_llm":[]} done"#;
        assert_eq!(
            parse_report(raw).unwrap_err(),
            GenerationError::MissingFields(vec![
                "key_findings".to_string(),
                "credibility_assessment".to_string()
            ])
        );
    }

    #[test]
    fn response_without_braces_has_no_json() {
        assert_eq!(
            parse_report("I cannot analyze this text.").unwrap_err(),
            GenerationError::NoJsonFound
        );
        assert_eq!(parse_report("} oops {").unwrap_err(), GenerationError::NoJsonFound);
    }

    #[test]
    fn malformed_span_is_invalid_json() {
        let err = parse_report(r#"{"summary": "unterminated}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidJson(_)));
    }

    #[test]
    fn prompt_embeds_text_and_keys() {
        let prompt = build_prompt("ARTICLE BODY");
        assert!(prompt.contains("--- START TEXT ---\nARTICLE BODY\n--- END TEXT ---"));
        for key in ["summary", "key_findings", "bias_indicators_llm", "credibility_assessment", "recommended_searches"] {
            assert!(prompt.contains(key), "prompt missing {key}");
        }
    }
}
