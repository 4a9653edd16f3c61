//! Heuristic main-content extraction.
//!
//! Noise elements are removed first, then the largest "article-looking"
//! container is chosen and its paragraphs joined. Pages with no recognizable
//! container fall back to every sufficiently long paragraph in the document.

use scraper::{ElementRef, Html, Selector};

const NOISE_TAGS: &str = "script, style, noscript, nav, footer, aside, header, form, \
                          button, input, select, textarea, label, iframe, svg";

const SEMANTIC_CONTAINERS: &str = "article, main, section";

const ID_KEYWORDS: &[&str] = &["content", "article", "post", "body"];

const CLASS_KEYWORDS: &[&str] = &["content", "article", "post", "body", "story", "main"];

/// Paragraphs at or under this many characters are skipped by the fallback scan.
const MIN_FALLBACK_PARAGRAPH_CHARS: usize = 50;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Extract the main readable text of an HTML page.
///
/// Returns `None` when nothing usable remains after noise stripping.
#[must_use]
pub fn extract_article_text(html: &str) -> Option<String> {
    let mut document = Html::parse_document(html);
    strip_noise(&mut document);

    let paragraph = selector("p");
    let text = match find_main_container(&document) {
        Some(container) => {
            let joined = join_paragraphs(container.select(&paragraph), 0);
            if joined.is_empty() {
                join_paragraphs(document.select(&paragraph), MIN_FALLBACK_PARAGRAPH_CHARS)
            } else {
                joined
            }
        }
        None => join_paragraphs(document.select(&paragraph), MIN_FALLBACK_PARAGRAPH_CHARS),
    };

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

fn strip_noise(document: &mut Html) {
    let noise = selector(NOISE_TAGS);
    let ids: Vec<_> = document.select(&noise).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Candidates in document order: semantic containers, then `div`s whose id or
/// class hints at article content. The one with the most visible text wins;
/// ties keep the earlier candidate.
fn find_main_container(document: &Html) -> Option<ElementRef<'_>> {
    let semantic = selector(SEMANTIC_CONTAINERS);
    let with_id = selector("div[id]");
    let with_class = selector("div[class]");

    let id_matches = document.select(&with_id).filter(|el| {
        el.value()
            .attr("id")
            .is_some_and(|id| contains_keyword(id, ID_KEYWORDS))
    });
    let class_matches = document.select(&with_class).filter(|el| {
        el.value()
            .attr("class")
            .is_some_and(|class| contains_keyword(class, CLASS_KEYWORDS))
    });

    let mut best: Option<(ElementRef<'_>, usize)> = None;
    for candidate in document.select(&semantic).chain(id_matches).chain(class_matches) {
        let len = visible_text_len(candidate);
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((candidate, len));
        }
    }
    best.map(|(el, _)| el)
}

fn contains_keyword(attr: &str, keywords: &[&str]) -> bool {
    let lower = attr.to_ascii_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

fn visible_text_len(el: ElementRef<'_>) -> usize {
    normalize_whitespace(&el.text().collect::<String>())
        .chars()
        .count()
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>, min_chars: usize) -> String {
    paragraphs
        .map(|p| normalize_whitespace(&p.text().collect::<String>()))
        .filter(|text| !text.is_empty() && text.chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "The council voted on Tuesday to approve the new transit budget after months of debate.";
    const LONG_B: &str = "Opponents argued that the plan leaves outlying neighborhoods without reliable service.";

    #[test]
    fn article_paragraphs_are_joined_and_noise_dropped() {
        let html = format!(
            "<html><body><nav><p>Home | World | Sports</p></nav>\
             <article><p>{LONG_A}</p><script>var x = 1;</script><p>{LONG_B}</p></article>\
             <footer><p>Copyright 2024 Example News</p></footer></body></html>"
        );
        let text = extract_article_text(&html).unwrap();
        assert_eq!(text, format!("{LONG_A}\n\n{LONG_B}"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn largest_candidate_container_wins() {
        let html = format!(
            "<html><body>\
             <section><p>Short teaser.</p></section>\
             <div class=\"story-body\"><p>{LONG_A}</p><p>{LONG_B}</p></div>\
             </body></html>"
        );
        let text = extract_article_text(&html).unwrap();
        assert!(text.starts_with(LONG_A));
        assert!(!text.contains("teaser"));
    }

    #[test]
    fn short_container_paragraphs_are_kept() {
        let html = "<html><body><main><p>Tiny.</p><p>Also tiny.</p></main></body></html>";
        assert_eq!(extract_article_text(html).unwrap(), "Tiny.\n\nAlso tiny.");
    }

    #[test]
    fn fallback_keeps_only_long_paragraphs() {
        let html = format!(
            "<html><body><div><p>Too short to count.</p><p>{LONG_A}</p></div></body></html>"
        );
        assert_eq!(extract_article_text(&html).unwrap(), LONG_A);
    }

    #[test]
    fn container_without_paragraphs_falls_back_to_document_scan() {
        let html = format!(
            "<html><body><article>Just a bare text node inside the article tag.</article>\
             <div><p>{LONG_B}</p></div></body></html>"
        );
        assert_eq!(extract_article_text(&html).unwrap(), LONG_B);
    }

    #[test]
    fn page_with_only_noise_yields_none() {
        let html = "<html><body><nav><p>Menu</p></nav><script>track()</script></body></html>";
        assert_eq!(extract_article_text(html), None);
    }

    #[test]
    fn whitespace_inside_paragraphs_is_collapsed() {
        let html = "<html><body><article><p>  one\n   two\tthree  </p></article></body></html>";
        assert_eq!(extract_article_text(html).unwrap(), "one two three");
    }
}
