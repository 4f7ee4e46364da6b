//! Structured rich text blocks and their HTML serialization

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::helpers::html_escape;

/// One rich text block (paragraph, heading, list item, image, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default = "default_block_type")]
    pub kind: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Block-specific fields (`url`, `alt`, `oembed`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_block_type() -> String {
    "paragraph".to_string()
}

/// Inline formatting over a character range of the block text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl RichTextBlock {
    /// A plain paragraph
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: default_block_type(),
            text: text.to_string(),
            spans: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The unformatted text of the block
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    fn to_html(&self) -> String {
        let inner = render_spans(&self.text, &self.spans);
        match self.kind.as_str() {
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
                let level = &self.kind["heading".len()..];
                format!("<h{}>{}</h{}>", level, inner, level)
            }
            "preformatted" => format!("<pre>{}</pre>", inner),
            "list-item" | "o-list-item" => format!("<li>{}</li>", inner),
            "image" => {
                let src = self.extra_str("url").unwrap_or_default();
                let alt = self.extra_str("alt").unwrap_or_default();
                format!(
                    r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                    html_escape(src),
                    html_escape(alt)
                )
            }
            "embed" => {
                let oembed = self.extra.get("oembed");
                let html = oembed
                    .and_then(|o| o.get("html"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let embed_url = oembed
                    .and_then(|o| o.get("embed_url"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                format!(
                    r#"<div data-oembed="{}">{}</div>"#,
                    html_escape(embed_url),
                    html
                )
            }
            _ => format!("<p>{}</p>", inner),
        }
    }
}

/// Concatenate the plain text of every block, one per line
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(RichTextBlock::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize blocks to HTML, grouping consecutive list items
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        html.push_str(&block.to_html());
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Apply spans to text
///
/// Span offsets count UTF-16 code units. The text is cut at every span
/// boundary and each segment is wrapped in the tags of all spans covering
/// it, so overlapping spans still produce well-nested markup.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();

    // UTF-16 offset where each char starts, then the end of the text
    let mut starts = Vec::with_capacity(chars.len() + 1);
    let mut offset = 0;
    for c in &chars {
        starts.push(offset);
        offset += c.len_utf16();
    }
    starts.push(offset);

    // An offset inside a surrogate pair moves to the next char boundary
    let to_char = |utf16: usize| starts.partition_point(|&s| s < utf16).min(chars.len());
    let ranges: Vec<(usize, usize)> = spans
        .iter()
        .map(|span| (to_char(span.start), to_char(span.end)))
        .collect();

    let mut bounds: Vec<usize> = vec![0, chars.len()];
    for &(start, end) in &ranges {
        bounds.push(start);
        bounds.push(end);
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut html = String::new();
    for window in bounds.windows(2) {
        let (start, end) = (window[0], window[1]);
        let segment: String = chars[start..end].iter().collect();
        let mut segment = html_escape(&segment).replace('\n', "<br />");

        for (span, &(span_start, span_end)) in spans.iter().zip(&ranges).rev() {
            if span_start <= start && end <= span_end {
                segment = wrap_span(span, &segment);
            }
        }
        html.push_str(&segment);
    }

    html
}

/// Rejects `javascript:` and other script-capable schemes
fn is_safe_link(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn wrap_span(span: &Span, inner: &str) -> String {
    match span.kind.as_str() {
        "strong" => format!("<strong>{}</strong>", inner),
        "em" => format!("<em>{}</em>", inner),
        "hyperlink" => {
            let url = span
                .data
                .get("url")
                .and_then(Value::as_str)
                .filter(|url| is_safe_link(url))
                .unwrap_or("#");
            let target = match span.data.get("target").and_then(Value::as_str) {
                Some(target) => format!(r#" target="{}" rel="noopener""#, html_escape(target)),
                None => String::new(),
            };
            format!(r#"<a href="{}"{}>{}</a>"#, html_escape(url), target, inner)
        }
        "label" => {
            let label = span
                .data
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!(r#"<span class="{}">{}</span>"#, html_escape(label), inner)
        }
        _ => inner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blocks(value: Value) -> Vec<RichTextBlock> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let blocks = blocks(json!([
            { "type": "heading2", "text": "Title", "spans": [] },
            { "type": "paragraph", "text": "a < b", "spans": [] }
        ]));
        assert_eq!(as_html(&blocks), "<h2>Title</h2><p>a &lt; b</p>");
    }

    #[test]
    fn test_spans() {
        let blocks = blocks(json!([{
            "type": "paragraph",
            "text": "read the docs now",
            "spans": [
                { "start": 0, "end": 4, "type": "strong" },
                { "start": 9, "end": 13, "type": "hyperlink", "data": { "url": "https://docs.rs" } }
            ]
        }]));
        assert_eq!(
            as_html(&blocks),
            r#"<p><strong>read</strong> the <a href="https://docs.rs">docs</a> now</p>"#
        );
    }

    #[test]
    fn test_overlapping_spans_stay_nested() {
        let blocks = blocks(json!([{
            "type": "paragraph",
            "text": "abcd",
            "spans": [
                { "start": 0, "end": 3, "type": "strong" },
                { "start": 2, "end": 4, "type": "em" }
            ]
        }]));
        assert_eq!(
            as_html(&blocks),
            "<p><strong>ab</strong><strong><em>c</em></strong><em>d</em></p>"
        );
    }

    #[test]
    fn test_list_grouping() {
        let blocks = blocks(json!([
            { "type": "list-item", "text": "one", "spans": [] },
            { "type": "list-item", "text": "two", "spans": [] },
            { "type": "o-list-item", "text": "first", "spans": [] },
            { "type": "paragraph", "text": "end", "spans": [] }
        ]));
        assert_eq!(
            as_html(&blocks),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>end</p>"
        );
    }

    #[test]
    fn test_image_block() {
        let blocks = blocks(json!([{
            "type": "image",
            "url": "https://images.prismic.io/a.png",
            "alt": "Rocket",
            "dimensions": { "width": 10, "height": 10 }
        }]));
        assert_eq!(
            as_html(&blocks),
            r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="Rocket"></p>"#
        );
        assert_eq!(blocks[0].plain_text(), "");
    }

    #[test]
    fn test_line_breaks_and_text() {
        let blocks = blocks(json!([
            { "type": "paragraph", "text": "line one\nline two", "spans": [] },
            { "type": "paragraph", "text": "next", "spans": [] }
        ]));
        assert_eq!(
            as_html(&blocks),
            "<p>line one<br />line two</p><p>next</p>"
        );
        assert_eq!(as_text(&blocks), "line one\nline two\nnext");
    }

    #[test]
    fn test_script_links_are_dropped() {
        let blocks = blocks(json!([{
            "type": "paragraph",
            "text": "click",
            "spans": [
                { "start": 0, "end": 5, "type": "hyperlink", "data": { "url": " JavaScript:alert(1)" } }
            ]
        }]));
        assert_eq!(as_html(&blocks), r##"<p><a href="#">click</a></p>"##);
    }

    #[test]
    fn test_span_offsets_count_utf16_units() {
        // "🚀" is two UTF-16 units, so "go" sits at 3..5
        let blocks = blocks(json!([{
            "type": "paragraph",
            "text": "🚀 go now",
            "spans": [{ "start": 3, "end": 5, "type": "strong" }]
        }]));
        assert_eq!(as_html(&blocks), "<p>🚀 <strong>go</strong> now</p>");
    }

    #[test]
    fn test_span_offsets_past_the_end_are_clamped() {
        let blocks = blocks(json!([{
            "type": "paragraph",
            "text": "olá",
            "spans": [{ "start": 1, "end": 40, "type": "em" }]
        }]));
        assert_eq!(as_html(&blocks), "<p>o<em>lá</em></p>");
    }
}
