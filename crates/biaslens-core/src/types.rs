use serde::{Deserialize, Serialize};

/// Source label used for articles that came straight from the request body.
pub const DIRECT_TEXT_SOURCE: &str = "Direct Text Input";

/// The three kinds of analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Url,
    Topic,
}

impl InputType {
    /// Parse the wire value (`text`, `url`, `topic`). Case-sensitive, like the
    /// request contract.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(InputType::Text),
            "url" => Some(InputType::Url),
            "topic" => Some(InputType::Topic),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Url => "url",
            InputType::Topic => "topic",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of article text ready for the signal clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleText {
    pub text: String,
    /// Where the text came from: a URL, or [`DIRECT_TEXT_SOURCE`].
    pub source_url: String,
}

impl ArticleText {
    #[must_use]
    pub fn new(text: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: source_url.into(),
        }
    }

    #[must_use]
    pub fn direct(text: impl Into<String>) -> Self {
        Self::new(text, DIRECT_TEXT_SOURCE)
    }
}
