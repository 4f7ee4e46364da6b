//! Projection of raw repository documents into [`Post`]s

use serde_json::Value;

use super::post::{Banner, ContentBlock, Post};
use super::richtext::RichTextBlock;
use crate::error::{Error, Result};
use crate::prismic::Document;

/// Map a document to a post, keeping only the fields a post page needs
///
/// Missing text fields become empty strings, but a missing uid, banner or
/// content list is reported as [`Error::MalformedDocument`].
pub fn project(document: &Document) -> Result<Post> {
    let uid = document
        .uid
        .clone()
        .ok_or_else(|| Error::malformed(&document.id, "missing uid"))?;
    let data = &document.data;

    let banner = data
        .get("banner")
        .filter(|b| b.is_object())
        .ok_or_else(|| Error::malformed(&uid, "missing data.banner"))?;
    let banner_url = banner
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed(&uid, "missing data.banner.url"))?;

    let content = data
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::malformed(&uid, "missing data.content"))?
        .iter()
        .map(|block| project_block(&uid, block))
        .collect::<Result<Vec<_>>>()?;

    Ok(Post {
        id: document.id.clone(),
        first_publication_date: document.first_publication_date,
        last_publication_date: document.last_publication_date,
        title: text_field(data, "title"),
        subtitle: text_field(data, "subtitle"),
        author: text_field(data, "author"),
        banner: Banner {
            url: banner_url.to_string(),
        },
        content,
        uid,
    })
}

fn project_block(uid: &str, block: &Value) -> Result<ContentBlock> {
    let body = match block.get("body") {
        None | Some(Value::Null) => Vec::new(),
        Some(body) => serde_json::from_value::<Vec<RichTextBlock>>(body.clone())
            .map_err(|e| Error::malformed(uid, format!("invalid content body: {}", e)))?,
    };

    Ok(ContentBlock {
        heading: text_field(block, "heading"),
        body,
    })
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismic::mock::post_document;
    use serde_json::json;

    fn document(data: Value) -> Document {
        serde_json::from_value(json!({
            "id": "YFzRm",
            "uid": "hello-world",
            "type": "posts",
            "first_publication_date": null,
            "last_publication_date": null,
            "data": data
        }))
        .unwrap()
    }

    #[test]
    fn test_project_keeps_declared_fields() {
        let doc = post_document("YFzRm", "como-utilizar-hooks", "Como utilizar Hooks", "um dois");
        let post = project(&doc).unwrap();

        assert_eq!(post.uid, "como-utilizar-hooks");
        assert_eq!(post.id, "YFzRm");
        assert_eq!(post.title, "Como utilizar Hooks");
        assert_eq!(post.subtitle, "Como utilizar Hooks subtitle");
        assert_eq!(post.author, "Joseph Oliveira");
        assert_eq!(
            post.banner.url,
            "https://images.prismic.io/como-utilizar-hooks.png"
        );
        assert_eq!(post.first_publication_date, doc.first_publication_date);
        assert_eq!(post.last_publication_date, doc.last_publication_date);
        assert_eq!(post.content.len(), 1);
        assert_eq!(post.content[0].heading, "Intro");
        assert_eq!(post.content[0].body[0].plain_text(), "um dois");
    }

    #[test]
    fn test_project_drops_unknown_fields() {
        let doc = post_document("YFzRm", "hello", "Hello", "text");
        let post = project(&doc).unwrap();

        let serialized = serde_json::to_string(&post).unwrap();
        assert!(!serialized.contains("seo_keywords"));
        assert!(!serialized.contains("should not leak"));
    }

    #[test]
    fn test_project_missing_banner_is_malformed() {
        let doc = document(json!({ "title": "Hello", "content": [] }));
        let err = project(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { ref reason, .. } if reason.contains("banner")));
    }

    #[test]
    fn test_project_missing_content_is_malformed() {
        let doc = document(json!({ "banner": { "url": "https://x/y.png" } }));
        let err = project(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { ref uid, .. } if uid == "hello-world"));
    }

    #[test]
    fn test_project_missing_uid_is_malformed() {
        let mut doc = post_document("YFzRm", "hello", "Hello", "text");
        doc.uid = None;
        let err = project(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { ref uid, .. } if uid == "YFzRm"));
    }

    #[test]
    fn test_project_tolerates_empty_text_fields() {
        let doc = document(json!({
            "title": null,
            "banner": { "url": "https://x/y.png" },
            "content": [{ "heading": null }, { "heading": "Two", "body": [] }]
        }));
        let post = project(&doc).unwrap();

        assert_eq!(post.title, "");
        assert_eq!(post.subtitle, "");
        assert_eq!(post.content[0].heading, "");
        assert!(post.content[0].body.is_empty());
        assert_eq!(post.content[1].heading, "Two");
        assert!(post.first_publication_date.is_none());
    }
}
