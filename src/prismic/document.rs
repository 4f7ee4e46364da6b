//! Wire shapes returned by the repository API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A raw document as returned by the repository
///
/// Only the envelope is typed; `data` stays loosely typed until
/// projection turns it into a [`crate::content::Post`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Repository-internal identifier
    pub id: String,

    /// Human-readable unique identifier (routing key)
    #[serde(default)]
    pub uid: Option<String>,

    /// Custom type name, e.g. "posts"
    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_publication_date: Option<DateTime<Utc>>,

    /// Custom type fields
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One page of results plus the cursor to the next page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Opaque cursor for the following page, `None` on the last page
    #[serde(default)]
    pub next_page: Option<String>,

    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            next_page: None,
            results: Vec::new(),
        }
    }
}

impl<T> PagedResult<T> {
    /// Whether another page can be requested
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    /// Map every result, keeping the cursor
    pub fn try_map<U, E>(
        self,
        f: impl FnMut(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<PagedResult<U>, E> {
        Ok(PagedResult {
            next_page: self.next_page,
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

/// Repository metadata (`GET {endpoint}`)
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub refs: Vec<RepositoryRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_master_ref: bool,
}

impl RepositoryInfo {
    /// The ref serving published content
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// Parse repository timestamps
///
/// The API emits `2021-03-25T19:25:28+0000` (no colon in the offset), which
/// is not RFC 3339, so both spellings are accepted.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}
