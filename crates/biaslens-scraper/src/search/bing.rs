//! Bing News RSS search.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Url};

use super::{collect_unique, SearchProvider};
use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://www.bing.com";

/// Queries the Bing News RSS feed, which needs no API key.
#[derive(Debug, Clone)]
pub struct BingNewsSearch {
    client: Client,
    base_url: String,
}

impl BingNewsSearch {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for BingNewsSearch {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/news/search?q={encoded}&format=rss&mkt=en-US",
            self.base_url
        );
        tracing::debug!(provider = self.name(), query, "searching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                provider: self.name(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        let links = parse_item_links(&body)?;
        Ok(collect_unique(links.iter().map(|l| unwrap_click_url(l)), max_results))
    }
}

/// Collect the `<link>` of every `<item>` in an RSS document.
pub(crate) fn parse_item_links(xml: &str) -> Result<Vec<String>, SearchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut links = Vec::new();
    let mut in_item = false;
    let mut in_link = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => in_item = true,
                b"link" if in_item => in_link = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => in_item = false,
                b"link" => in_link = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_link => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                if !text.is_empty() {
                    links.push(text);
                }
            }
            Ok(Event::CData(e)) if in_link => {
                let text = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                if !text.is_empty() {
                    links.push(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SearchError::Xml(e)),
            _ => {}
        }
    }

    Ok(links)
}

/// Bing wraps publisher links in `apiclick.aspx?...&url=<target>`.
fn unwrap_click_url(link: &str) -> String {
    Url::parse(link)
        .ok()
        .filter(|u| u.host_str().is_some_and(|h| h.ends_with("bing.com")))
        .and_then(|u| {
            u.query_pairs()
                .find(|(key, _)| key == "url")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or_else(|| link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel>
  <title>Bing News</title>
  <link>https://www.bing.com/news</link>
  <item>
    <title>First</title>
    <link>http://www.bing.com/news/apiclick.aspx?ref=FexRss&amp;aid=&amp;url=https%3a%2f%2fnews.example.com%2fa&amp;c=1</link>
  </item>
  <item>
    <title>Second</title>
    <link>https://direct.example.org/b</link>
  </item>
</channel></rss>"#;

    #[test]
    fn item_links_exclude_channel_link() {
        let links = parse_item_links(FEED).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[1].ends_with("/b"));
    }

    #[test]
    fn click_wrappers_are_unwrapped() {
        let links = parse_item_links(FEED).unwrap();
        assert_eq!(unwrap_click_url(&links[0]), "https://news.example.com/a");
        assert_eq!(unwrap_click_url(&links[1]), "https://direct.example.org/b");
    }
}
