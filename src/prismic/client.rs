//! HTTP client for the Prismic v2 REST API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::{ContentClient, Document, PagedResult, QueryOptions, RepositoryInfo};
use crate::config::SiteConfig;
use crate::error::{Error, Result};

/// Environment variable overriding `prismic.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Prismic repository client
///
/// Every query resolves the master ref first unless a preview ref is given,
/// so published content is always read from the latest release.
pub struct PrismicClient {
    endpoint: Url,
    access_token: Option<String>,
    http_client: reqwest::Client,
}

impl PrismicClient {
    /// Create a client for a repository endpoint such as
    /// `https://my-repo.cdn.prismic.io/api/v2`
    pub fn new(endpoint: &str, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::UpstreamQuery(format!("invalid endpoint {}: {}", endpoint, e)))?;
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            access_token: access_token.filter(|t| !t.is_empty()),
            http_client,
        })
    }

    /// Create a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .or_else(|| config.prismic.access_token.clone());

        Self::new(
            &config.prismic.endpoint,
            access_token,
            Duration::from_secs(config.prismic.timeout_secs),
        )
    }

    /// Resolve the master ref of the repository
    pub async fn master_ref(&self) -> Result<String> {
        let mut url = self.endpoint.clone();
        self.append_token(&mut url);

        let info: RepositoryInfo = self.get_json(url).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or_else(|| Error::UpstreamQuery("repository has no master ref".to_string()))
    }

    async fn search(
        &self,
        reference: Option<&str>,
        params: &[(&str, String)],
    ) -> Result<PagedResult<Document>> {
        let reference = match reference {
            Some(r) => r.to_string(),
            None => self.master_ref().await?,
        };

        let mut url = self.search_url()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &reference);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        self.append_token(&mut url);

        self.get_json(url).await
    }

    async fn search_one(
        &self,
        predicate: String,
        reference: Option<&str>,
    ) -> Result<Option<Document>> {
        let page = self
            .search(reference, &[("q", predicate), ("pageSize", "1".to_string())])
            .await?;
        Ok(page.results.into_iter().next())
    }

    fn search_url(&self) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::UpstreamQuery(format!("endpoint {} cannot be a base", self.endpoint))
            })?
            .pop_if_empty()
            .push("documents")
            .push("search");
        Ok(url)
    }

    fn append_token(&self, url: &mut Url) {
        if let Some(token) = &self.access_token {
            let already_present = url.query_pairs().any(|(k, _)| k == "access_token");
            if !already_present {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url.path());

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::UpstreamQuery(format!("{} - {}", status, error_text)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::UpstreamQuery(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ContentClient for PrismicClient {
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<PagedResult<Document>> {
        let mut params = vec![
            ("q", format!("[[at(document.type,\"{}\")]]", quote(doc_type))),
            ("pageSize", options.page_size.to_string()),
            ("orderings", options.ordering.as_orderings().to_string()),
        ];
        if let Some(after) = &options.after {
            params.push(("after", after.clone()));
        }

        self.search(None, &params).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<PagedResult<Document>> {
        let mut url = Url::parse(cursor)
            .map_err(|e| Error::UpstreamQuery(format!("invalid cursor: {}", e)))?;
        if url.origin() != self.endpoint.origin() {
            return Err(Error::UpstreamQuery(format!(
                "cursor {} is outside the repository",
                url.origin().ascii_serialization()
            )));
        }
        self.append_token(&mut url);

        self.get_json(url).await
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>> {
        let predicate = format!("[[at(my.{}.uid,\"{}\")]]", quote(doc_type), quote(uid));
        self.search_one(predicate, reference).await
    }

    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>> {
        let predicate = format!("[[at(document.id,\"{}\")]]", quote(id));
        self.search_one(predicate, reference).await
    }
}

/// Escape a value embedded in a predicate string literal
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
