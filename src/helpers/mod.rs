//! Helper functions for templates
//!
//! Date formatting, URL generation and HTML escaping shared by the
//! static generator and the live server.

mod date;
mod html;
mod url;

use chrono::{DateTime, Locale, Utc};
use chrono_tz::Tz;

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;
use crate::content::Post;

/// Collection of helper functions bound to one site configuration
#[derive(Clone)]
pub struct Helpers {
    config: SiteConfig,
    locale: Locale,
    timezone: Tz,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        let locale = parse_locale(&config.language);
        let timezone = parse_timezone(&config.timezone);
        Self {
            config,
            locale,
            timezone,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Link to a post page
    pub fn post_url(&self, uid: &str) -> String {
        post_url(&self.config, uid)
    }

    /// Format a publication date, `None` for unpublished content
    pub fn date(&self, date: Option<DateTime<Utc>>) -> Option<String> {
        date.map(|d| format_date(&d, &self.config.date_format, self.locale, self.timezone))
    }

    /// Machine-readable date for `<time datetime>`
    pub fn date_xml(&self, date: Option<DateTime<Utc>>) -> Option<String> {
        date.map(|d| date_xml(&d.with_timezone(&self.timezone)))
    }

    /// "updated at" line, only for posts edited after publication
    pub fn updated_at(&self, post: &Post) -> Option<String> {
        if !post.was_updated() {
            return None;
        }
        post.last_publication_date
            .map(|d| format_date(&d, &self.config.updated_format, self.locale, self.timezone))
    }
}
