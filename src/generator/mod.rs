//! Generator module - renders the whole blog into static files

pub mod context;

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::content::{DetailAssembler, ListingAggregator, Post};
use crate::helpers::Helpers;
use crate::prismic::{ContentClient, Ordering, PagedResult};
use crate::templates::TemplateRenderer;
use crate::Spacetraveling;

/// What a generation run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    pub posts: usize,
    pub pages: usize,
}

/// Static site generator
pub struct Generator {
    site: Spacetraveling,
    renderer: TemplateRenderer,
    helpers: Helpers,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Spacetraveling) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
            helpers: Helpers::new(site.config.clone()),
        })
    }

    /// Generate the entire site from the repository behind `client`
    pub async fn generate<C: ContentClient + ?Sized>(&self, client: &C) -> Result<GenerateSummary> {
        fs::create_dir_all(&self.site.public_dir)?;

        // Copy source assets (stylesheets, images, etc.)
        self.copy_source_assets()?;

        // Every listing page, newest posts first
        let listing = ListingAggregator::new(client);
        let pages = listing
            .load_all(self.site.config.per_page, Ordering::PublicationDateDesc)
            .await?;

        let mut posts: Vec<&Post> = Vec::new();
        for page in &pages {
            posts.extend(page.results.iter());
        }
        tracing::info!("Loaded {} posts in {} pages", posts.len(), pages.len());

        self.generate_listing_pages(&pages)?;
        self.generate_post_pages(client, &posts).await?;
        self.generate_not_found_page()?;

        Ok(GenerateSummary {
            posts: posts.len(),
            pages: pages.len(),
        })
    }

    /// Link the "load more" button follows to reach listing page `number`
    fn page_link(&self, number: usize) -> String {
        self.helpers
            .url_for(&format!("posts/page/{}.json", number))
    }

    /// Generate `index.html` plus one JSON file per following page
    fn generate_listing_pages(&self, pages: &[PagedResult<Post>]) -> Result<()> {
        for (i, page) in pages.iter().enumerate() {
            let number = i + 1;
            let next_link = page.has_next().then(|| self.page_link(number + 1));

            if number == 1 {
                let context = context::home_context(&self.helpers, page, next_link, false);
                let html = self.renderer.render("index.html", &context)?;
                let output_path = self.site.public_dir.join("index.html");
                fs::write(&output_path, html)?;
                tracing::debug!("Generated: {:?}", output_path);
            } else {
                let data = context::posts_page(&self.helpers, page, next_link);
                let output_path = self
                    .site
                    .public_dir
                    .join(format!("posts/page/{}.json", number));
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, serde_json::to_string_pretty(&data)?)?;
                tracing::debug!("Generated: {:?}", output_path);
            }
        }

        Ok(())
    }

    /// Generate individual post pages
    async fn generate_post_pages<C: ContentClient + ?Sized>(
        &self,
        client: &C,
        posts: &[&Post],
    ) -> Result<()> {
        let detail = DetailAssembler::new(client);

        for post in posts {
            let adjacent = detail.resolve_adjacent(post).await?;
            let context = context::post_context(&self.helpers, post, &adjacent, false);
            let html = self.renderer.render("post.html", &context)?;

            let output_path = self.post_output_path(&post.uid)?;
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
            }
            fs::write(&output_path, &html)
                .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let context = context::not_found_context(&self.helpers);
        let html = self.renderer.render("404.html", &context)?;
        fs::write(self.site.public_dir.join("404.html"), html)?;
        Ok(())
    }

    /// `public/post/<uid>/index.html`, refusing uids that would escape it
    fn post_output_path(&self, uid: &str) -> Result<PathBuf> {
        if uid.is_empty() || uid == "." || uid == ".." || uid.contains(['/', '\\']) {
            anyhow::bail!("Refusing to write post with unsafe uid {:?}", uid);
        }
        Ok(self
            .site
            .public_dir
            .join("post")
            .join(uid)
            .join("index.html"))
    }

    /// Copy source assets (stylesheets, images, etc.) to public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(source_dir)?;
                let dest = self.site.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}
