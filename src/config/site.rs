//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// chrono locale name used for month names, e.g. `pt_BR`
    pub language: String,
    /// IANA timezone used to display publication dates
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Listing
    pub per_page: usize,

    // Date / Time format (strftime)
    pub date_format: String,
    pub updated_format: String,

    // Content repository
    #[serde(default)]
    pub prismic: PrismicConfig,

    // Comments widget
    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt_BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),

            per_page: 4,

            date_format: "%-d %b %Y".to_string(),
            updated_format: "%d %b %Y, às %H:%M".to_string(),

            prismic: PrismicConfig::default(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the content repository cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.per_page < 1 {
            anyhow::bail!("per_page must be at least 1, got {}", self.per_page);
        }
        Ok(())
    }
}

/// Content repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicConfig {
    /// Repository API endpoint
    pub endpoint: String,
    /// Token for private repositories
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for PrismicConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

/// utterances comments configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// GitHub `owner/repo` receiving the comment issues; empty disables comments
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            issue_term: "title".to_string(),
            theme: "photon-dark".to_string(),
        }
    }
}

impl CommentsConfig {
    pub fn enabled(&self) -> bool {
        !self.repo.trim().is_empty()
    }
}
