//! spacetraveling: a blog front-end backed by a Prismic content repository
//!
//! Posts are fetched from the repository, projected into a fixed [`content::Post`]
//! shape and rendered with embedded Tera templates, either into static files
//! (`generate`) or on each request (`server`).

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod prismic;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// Name of the configuration file inside the site directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Spacetraveling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory (static assets)
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Spacetraveling {
    /// Load a site from a directory; a missing `_config.yml` means defaults
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let site = Spacetraveling::new(dir.path()).unwrap();

        assert_eq!(site.config.title, "spacetraveling");
        assert_eq!(site.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_config_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Meu blog\npublic_dir: dist\n",
        )
        .unwrap();

        let site = Spacetraveling::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Meu blog");
        assert_eq!(site.public_dir, dir.path().join("dist"));
        assert_eq!(site.source_dir, dir.path().join("source"));
    }
}
