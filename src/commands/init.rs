//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
description: ''
language: pt_BR
timezone: America/Sao_Paulo

# URL
url: http://localhost:4000
root: /

# Directory
source_dir: source
public_dir: public

# Listing
per_page: 4

# Date / Time format (strftime)
date_format: '%-d %b %Y'
updated_format: '%d %b %Y, às %H:%M'

# Content repository
# The PRISMIC_ACCESS_TOKEN environment variable overrides access_token.
prismic:
  endpoint: https://spacetraveling.cdn.prismic.io/api/v2
  access_token:
  timeout_secs: 10

# Comments (utterances); leave repo empty to disable
comments:
  repo: ''
  issue_term: title
  theme: photon-dark
"#;

const DEFAULT_STYLE: &str = r#"* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  background: #1a1d23;
  color: #d7d7d7;
  font-family: 'Inter', sans-serif;
  -webkit-font-smoothing: antialiased;
}

a {
  color: inherit;
  text-decoration: none;
}

.container {
  max-width: 720px;
  margin: 0 auto;
  padding: 0 1rem;
}

.header {
  padding: 4rem 0 3rem;
}

.logo {
  font-size: 1.75rem;
  font-weight: 700;
  color: #f8f8f8;
}

.posts .post {
  display: block;
  margin-bottom: 3rem;
}

.post-title {
  color: #f8f8f8;
  font-size: 1.75rem;
  line-height: 1.4;
}

.post-subtitle {
  margin: 0.5rem 0 1.5rem;
  font-size: 1.125rem;
  line-height: 1.6;
}

.post-info {
  display: flex;
  gap: 1.5rem;
  list-style: none;
  font-size: 0.875rem;
  color: #bbb;
}

.btn-more-posts {
  margin-bottom: 4rem;
  border: 0;
  background: transparent;
  color: #ff57b2;
  font-size: 1.125rem;
  font-weight: 600;
  cursor: pointer;
}

.btn-more-posts:disabled {
  opacity: 0.6;
  cursor: progress;
}

.post-header img {
  width: 100%;
  max-height: 400px;
  object-fit: cover;
}

.post-container {
  margin-top: 5rem;
}

.updated-at {
  display: block;
  margin-top: 1.5rem;
  font-style: italic;
  font-size: 0.875rem;
}

.post-content section {
  margin-top: 4rem;
}

.post-content h3 {
  color: #f8f8f8;
  font-size: 2.25rem;
  margin-bottom: 2rem;
}

.post-content p,
.post-content li {
  font-size: 1.125rem;
  line-height: 1.8;
  margin-bottom: 1rem;
}

.post-content a {
  color: #ff57b2;
}

.post-footer {
  margin: 4rem 0;
  padding-top: 3rem;
  border-top: 1px solid #494a4d;
}

.nav-posts {
  display: flex;
  justify-content: space-between;
  margin-bottom: 3rem;
}

.nav-link span {
  display: block;
  margin-bottom: 0.25rem;
}

.nav-link a {
  color: #ff57b2;
}

.next-post {
  text-align: right;
}

.exit-preview {
  display: inline-block;
  margin: 2rem 0;
  padding: 0.75rem 1.5rem;
  border-radius: 2rem;
  background: #ff57b2;
  color: #fff;
  font-weight: 600;
}

.not-found {
  color: #f8f8f8;
  margin-bottom: 1rem;
}
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("source/css"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    write_if_missing(&target_dir.join("source/css/style.css"), DEFAULT_STYLE)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Skipping existing file: {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}
