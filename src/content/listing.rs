//! Post listing with cursor pagination
//!
//! The aggregator holds no state between calls: it turns one page of
//! documents into one page of posts. Callers that show a growing list
//! append each returned page to their own sequence.

use std::collections::HashSet;

use super::projection::project;
use super::{Post, POST_TYPE};
use crate::error::{Error, Result};
use crate::prismic::{ContentClient, Ordering, PagedResult, QueryOptions};

/// Fetches pages of posts from a content client
pub struct ListingAggregator<'a, C: ContentClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ContentClient + ?Sized> ListingAggregator<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the first page of posts
    pub async fn initialize(
        &self,
        page_size: usize,
        ordering: Ordering,
    ) -> Result<PagedResult<Post>> {
        tracing::debug!("Loading first {} posts", page_size);

        let page = self
            .client
            .query_by_type(POST_TYPE, &QueryOptions::new(page_size, ordering))
            .await?;
        page.try_map(|doc| project(&doc))
    }

    /// Fetch the page after `state`
    ///
    /// Only the new page is returned. Fails with [`Error::NoMorePages`]
    /// without touching the network when `state` has no cursor.
    pub async fn load_next(&self, state: &PagedResult<Post>) -> Result<PagedResult<Post>> {
        let cursor = state.next_page.as_deref().ok_or(Error::NoMorePages)?;
        tracing::debug!("Loading next page of posts");

        let page = self.client.fetch_page(cursor).await?;
        page.try_map(|doc| project(&doc))
    }

    /// Walk every page, accumulating posts in order
    ///
    /// Fails with [`Error::UpstreamQuery`] when the repository hands back a
    /// cursor that was already followed.
    pub async fn load_all(
        &self,
        page_size: usize,
        ordering: Ordering,
    ) -> Result<Vec<PagedResult<Post>>> {
        let mut pages = vec![self.initialize(page_size, ordering).await?];
        let mut followed = HashSet::new();

        while let Some(last) = pages.last().filter(|p| p.has_next()) {
            if let Some(cursor) = last.next_page.as_deref() {
                if !followed.insert(cursor.to_string()) {
                    return Err(Error::UpstreamQuery(format!(
                        "pagination cursor repeated: {}",
                        cursor
                    )));
                }
            }
            let next = self.load_next(last).await?;
            pages.push(next);
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismic::mock::{page, post_document, MockClient};

    fn four_then_two() -> MockClient {
        let mut client = MockClient::new();
        client.first_page = page(
            (1..=4)
                .map(|i| post_document(&format!("id{}", i), &format!("post-{}", i), "T", "x"))
                .collect(),
            Some("page2"),
        );
        client.pages.insert(
            "page2".to_string(),
            page(
                (5..=6)
                    .map(|i| post_document(&format!("id{}", i), &format!("post-{}", i), "T", "x"))
                    .collect(),
                None,
            ),
        );
        client
    }

    #[tokio::test]
    async fn test_initialize_queries_posts_by_date_desc() {
        let client = four_then_two();
        let listing = ListingAggregator::new(&client);

        let first = listing
            .initialize(4, Ordering::PublicationDateDesc)
            .await
            .unwrap();

        assert_eq!(first.results.len(), 4);
        assert_eq!(first.next_page.as_deref(), Some("page2"));
        assert_eq!(
            client.calls(),
            vec!["query posts size=4 [document.first_publication_date desc] after=-"]
        );
    }

    #[tokio::test]
    async fn test_caller_accumulates_pages_in_order() {
        let client = four_then_two();
        let listing = ListingAggregator::new(&client);

        let first = listing
            .initialize(4, Ordering::PublicationDateDesc)
            .await
            .unwrap();
        let mut posts = first.results.clone();

        let second = listing.load_next(&first).await.unwrap();
        posts.extend(second.results.iter().cloned());

        assert_eq!(second.results.len(), 2);
        assert!(second.next_page.is_none());
        let uids: Vec<_> = posts.iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(
            uids,
            vec!["post-1", "post-2", "post-3", "post-4", "post-5", "post-6"]
        );

        let err = listing.load_next(&second).await.unwrap_err();
        assert!(matches!(err, Error::NoMorePages));
    }

    #[tokio::test]
    async fn test_load_next_without_cursor_skips_network() {
        let client = MockClient::new();
        let listing = ListingAggregator::new(&client);

        let err = listing
            .load_next(&PagedResult::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoMorePages));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mut client = MockClient::new();
        client.fail = true;
        let listing = ListingAggregator::new(&client);

        let err = listing
            .initialize(4, Ordering::PublicationDateDesc)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamQuery(_)));
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_document_fails_the_page() {
        let mut client = MockClient::new();
        let mut broken = post_document("id1", "broken", "T", "x");
        broken.data = serde_json::json!({ "title": "no banner" });
        client.first_page = page(vec![broken], None);
        let listing = ListingAggregator::new(&client);

        let err = listing
            .initialize(4, Ordering::PublicationDateDesc)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[tokio::test]
    async fn test_load_all_walks_every_cursor() {
        let client = four_then_two();
        let listing = ListingAggregator::new(&client);

        let pages = listing
            .load_all(4, Ordering::PublicationDateDesc)
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(client.calls().last().unwrap(), "fetch page2");
    }

    #[tokio::test]
    async fn test_load_all_stops_on_repeated_cursor() {
        let mut client = four_then_two();
        client.pages.insert(
            "page2".to_string(),
            page(vec![post_document("id5", "post-5", "T", "x")], Some("page2")),
        );
        let listing = ListingAggregator::new(&client);

        let err = listing
            .load_all(4, Ordering::PublicationDateDesc)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UpstreamQuery(ref msg) if msg.contains("page2")));
        assert_eq!(
            client
                .calls()
                .iter()
                .filter(|c| c.starts_with("fetch"))
                .count(),
            1
        );
    }
}
