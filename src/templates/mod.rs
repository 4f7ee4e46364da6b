//! Built-in templates using the Tera template engine
//!
//! Templates are embedded in the binary; HTML autoescaping stays on, so
//! only rich text serialized by [`crate::content::richtext`] is marked safe.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("404.html", include_str!("spacetraveling/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
            (
                "partials/exit_preview.html",
                include_str!("spacetraveling/partials/exit_preview.html"),
            ),
            (
                "partials/comments.html",
                include_str!("spacetraveling/partials/comments.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };

    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some("..."),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub lang: String,
    pub url: String,
    pub root: String,
}

/// A post on the listing page (also the JSON shape of "load more" pages)
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub uid: String,
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
}

/// A page of cards fetched by the "load more" button
#[derive(Debug, Clone, Serialize)]
pub struct PostsPageData {
    pub next_page: Option<String>,
    pub results: Vec<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub updated_at: Option<String>,
    pub read_time: usize,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub anchor: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsData {
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}
