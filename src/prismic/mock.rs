//! In-memory content client for tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ContentClient, Document, Ordering, PagedResult, QueryOptions};
use crate::error::{Error, Result};

/// Canned repository that records every call it receives
#[derive(Default)]
pub struct MockClient {
    /// Returned by `query_by_type` without `after`
    pub first_page: PagedResult<Document>,
    /// Pages returned by `fetch_page`, keyed by cursor
    pub pages: HashMap<String, PagedResult<Document>>,
    /// Documents visible to uid/id lookups
    pub documents: Vec<Document>,
    /// Result of the ascending `after` query
    pub after_asc: Vec<Document>,
    /// Result of the descending `after` query
    pub after_desc: Vec<Document>,
    /// Make every call fail with an upstream error
    pub fail: bool,
    calls: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(Error::UpstreamQuery("503 - unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentClient for MockClient {
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<PagedResult<Document>> {
        self.record(format!(
            "query {} size={} {} after={}",
            doc_type,
            options.page_size,
            options.ordering.as_orderings(),
            options.after.as_deref().unwrap_or("-")
        ))?;

        if options.after.is_none() {
            return Ok(self.first_page.clone());
        }

        let results = match options.ordering {
            Ordering::PublicationDateAsc => &self.after_asc,
            Ordering::PublicationDateDesc => &self.after_desc,
        };
        Ok(PagedResult {
            next_page: None,
            results: results.iter().take(options.page_size).cloned().collect(),
        })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<PagedResult<Document>> {
        self.record(format!("fetch {}", cursor))?;
        self.pages
            .get(cursor)
            .cloned()
            .ok_or_else(|| Error::UpstreamQuery(format!("404 - unknown cursor {}", cursor)))
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>> {
        self.record(format!(
            "uid {} {} ref={}",
            doc_type,
            uid,
            reference.unwrap_or("-")
        ))?;
        Ok(self
            .documents
            .iter()
            .find(|d| d.doc_type == doc_type && d.uid.as_deref() == Some(uid))
            .cloned())
    }

    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>> {
        self.record(format!("id {} ref={}", id, reference.unwrap_or("-")))?;
        Ok(self.documents.iter().find(|d| d.id == id).cloned())
    }
}

/// A well-formed post document whose single content block holds `body`
pub fn post_document(id: &str, uid: &str, title: &str, body: &str) -> Document {
    serde_json::from_value(json!({
        "id": id,
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "last_publication_date": "2021-03-26T10:00:00+0000",
        "data": {
            "title": title,
            "subtitle": format!("{} subtitle", title),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.prismic.io/{}.png", uid), "alt": null },
            "content": [{
                "heading": "Intro",
                "body": [{ "type": "paragraph", "text": body, "spans": [] }]
            }],
            "seo_keywords": "should not leak"
        }
    }))
    .unwrap()
}

/// A page of documents with the given cursor
pub fn page(documents: Vec<Document>, next_page: Option<&str>) -> PagedResult<Document> {
    PagedResult {
        next_page: next_page.map(str::to_string),
        results: documents,
    }
}
