//! Content client - queries against the headless repository
//!
//! The rest of the crate only depends on the [`ContentClient`] trait;
//! [`PrismicClient`] is the HTTP implementation used by the CLI.

mod client;
mod document;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::Result;

pub use client::PrismicClient;
pub use document::{parse_timestamp, Document, PagedResult, RepositoryInfo, RepositoryRef};

/// Sort order for type queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Newest first
    #[default]
    PublicationDateDesc,
    /// Oldest first
    PublicationDateAsc,
}

impl Ordering {
    /// The `orderings` query parameter value
    pub fn as_orderings(&self) -> &'static str {
        match self {
            Ordering::PublicationDateDesc => "[document.first_publication_date desc]",
            Ordering::PublicationDateAsc => "[document.first_publication_date]",
        }
    }
}

/// Options for [`ContentClient::query_by_type`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: usize,
    pub ordering: Ordering,
    /// Only return documents positioned after this document id
    pub after: Option<String>,
}

impl QueryOptions {
    pub fn new(page_size: usize, ordering: Ordering) -> Self {
        Self {
            page_size,
            ordering,
            after: None,
        }
    }

    pub fn after(mut self, id: &str) -> Self {
        self.after = Some(id.to_string());
        self
    }
}

/// Read access to a content repository
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Query one page of documents of the given type
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<PagedResult<Document>>;

    /// Follow an opaque cursor returned in `next_page`
    async fn fetch_page(&self, cursor: &str) -> Result<PagedResult<Document>>;

    /// Look up a document by uid; `reference` selects a draft revision
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>>;

    /// Look up a document by its internal id
    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderings() {
        assert_eq!(
            Ordering::PublicationDateDesc.as_orderings(),
            "[document.first_publication_date desc]"
        );
        assert_eq!(
            Ordering::PublicationDateAsc.as_orderings(),
            "[document.first_publication_date]"
        );
    }

    #[test]
    fn test_query_options_after() {
        let options = QueryOptions::new(1, Ordering::PublicationDateAsc).after("YFzRm");
        assert_eq!(options.after.as_deref(), Some("YFzRm"));
        assert_eq!(options.page_size, 1);
    }
}
