//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::richtext::RichTextBlock;

/// A blog post projected from a repository document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Repository-internal document id (anchor for adjacent-post queries)
    pub id: String,

    /// Routing key, unique among posts
    pub uid: String,

    /// `None` only for drafts that were never published
    pub first_publication_date: Option<DateTime<Utc>>,

    pub last_publication_date: Option<DateTime<Utc>>,

    pub title: String,

    pub subtitle: String,

    pub author: String,

    pub banner: Banner,

    /// Ordered content sections
    pub content: Vec<ContentBlock>,
}

/// Banner image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

/// A titled section of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

impl Post {
    /// Whether the post was edited after its first publication
    pub fn was_updated(&self) -> bool {
        match (self.first_publication_date, self.last_publication_date) {
            (Some(first), Some(last)) => first != last,
            _ => false,
        }
    }
}
