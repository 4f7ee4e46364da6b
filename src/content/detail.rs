//! Post detail: lookup by uid, read time and adjacent posts

use serde::Serialize;

use super::projection::project;
use super::{richtext, Post, POST_TYPE};
use crate::error::{Error, Result};
use crate::prismic::{ContentClient, Ordering, QueryOptions};

/// Reading rate used by [`estimate_read_time`]
pub const WORDS_PER_MINUTE: usize = 200;

/// Posts immediately around a post in publication order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adjacent {
    pub previous: Option<Post>,
    pub next: Option<Post>,
}

/// Assembles everything a post page shows
pub struct DetailAssembler<'a, C: ContentClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ContentClient + ?Sized> DetailAssembler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch a post by uid, from the draft revision `preview_ref` when given
    pub async fn resolve_post(&self, uid: &str, preview_ref: Option<&str>) -> Result<Post> {
        tracing::debug!("Resolving post {}", uid);

        let document = self
            .client
            .get_by_uid(POST_TYPE, uid, preview_ref)
            .await?
            .ok_or_else(|| Error::PostNotFound(uid.to_string()))?;
        project(&document)
    }

    /// Find the posts published right before and after `post`
    ///
    /// Both queries are anchored after the post's document id; ties on the
    /// publication date follow the repository's own ordering.
    pub async fn resolve_adjacent(&self, post: &Post) -> Result<Adjacent> {
        let previous = self
            .first_after(post, Ordering::PublicationDateAsc)
            .await?;
        let next = self
            .first_after(post, Ordering::PublicationDateDesc)
            .await?;

        Ok(Adjacent { previous, next })
    }

    async fn first_after(&self, post: &Post, ordering: Ordering) -> Result<Option<Post>> {
        let options = QueryOptions::new(1, ordering).after(&post.id);
        let page = self.client.query_by_type(POST_TYPE, &options).await?;

        page.results.first().map(project).transpose()
    }
}

/// Estimated reading time in whole minutes, rounded up
///
/// Counts whitespace-separated tokens in every heading and every body
/// block. A post without content reads in 0 minutes.
pub fn estimate_read_time(post: &Post) -> usize {
    let words: usize = post
        .content
        .iter()
        .map(|block| {
            block.heading.split_whitespace().count()
                + richtext::as_text(&block.body).split_whitespace().count()
        })
        .sum();

    words.div_ceil(WORDS_PER_MINUTE)
}
