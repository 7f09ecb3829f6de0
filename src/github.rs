//! GitHub REST client for deployments and deployment statuses.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::models::{Deployment, DeploymentId, DeploymentStatus, RepoRef};
use crate::source::{DeploymentQuery, DeploymentSource, Page, PageRequest, StatusSource};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const STATUSES_PER_PAGE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}: {message}")]
    Status {
        status: StatusCode,
        url: String,
        message: String,
    },

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GitHubError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidUrl(base_url.to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| GitHubError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("leadtime/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, GitHubError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(GitHubError::Status {
            status,
            url: url.to_string(),
            message,
        })
    }

    pub async fn deployments(
        &self,
        query: &DeploymentQuery,
        page: PageRequest,
    ) -> Result<Page<Deployment>, GitHubError> {
        let mut url = self.endpoint(&[
            "repos",
            query.repo.owner(),
            query.repo.name(),
            "deployments",
        ]);
        url.query_pairs_mut()
            .append_pair("environment", &query.environment)
            .append_pair("per_page", &page.per_page.to_string())
            .append_pair("page", &page.page.to_string());

        let response = self.get(url).await?;
        let next = next_page(response.headers());
        let items: Vec<Deployment> = response.json().await?;
        debug!(page = page.page, count = items.len(), ?next, "fetched deployments page");

        Ok(Page { items, next })
    }

    pub async fn statuses(
        &self,
        repo: &RepoRef,
        id: DeploymentId,
    ) -> Result<Vec<DeploymentStatus>, GitHubError> {
        let id = id.to_string();
        let mut url = self.endpoint(&[
            "repos",
            repo.owner(),
            repo.name(),
            "deployments",
            id.as_str(),
            "statuses",
        ]);
        url.query_pairs_mut()
            .append_pair("per_page", &STATUSES_PER_PAGE.to_string());

        let response = self.get(url).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DeploymentSource for GitHubClient {
    async fn list_deployments(
        &self,
        query: &DeploymentQuery,
        page: PageRequest,
    ) -> Result<Page<Deployment>> {
        Ok(self.deployments(query, page).await?)
    }
}

#[async_trait]
impl StatusSource for GitHubClient {
    async fn list_statuses(
        &self,
        repo: &RepoRef,
        id: DeploymentId,
    ) -> Result<Vec<DeploymentStatus>> {
        Ok(self.statuses(repo, id).await?)
    }
}

/// Extracts the `page` parameter of the `rel="next"` entry in a `Link` header.
fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_page(link)
}

fn parse_next_page(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }

        let url = Url::parse(target.trim_start_matches('<').trim_end_matches('>')).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_page() {
        let link = r#"<https://api.github.com/repositories/1/deployments?environment=prod&per_page=100&page=3>; rel="next", <https://api.github.com/repositories/1/deployments?environment=prod&per_page=100&page=7>; rel="last""#;
        assert_eq!(parse_next_page(link), Some(3));
    }

    #[test]
    fn test_parse_next_page_on_last_page() {
        let link = r#"<https://api.github.com/repositories/1/deployments?page=1>; rel="first", <https://api.github.com/repositories/1/deployments?page=6>; rel="prev""#;
        assert_eq!(parse_next_page(link), None);
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client =
            GitHubClient::new("https://ghe.example.com/api/v3/", "t", Duration::from_secs(1))
                .unwrap();
        let url = client.endpoint(&["repos", "acme", "web app", "deployments"]);
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/web%20app/deployments"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let result = GitHubClient::new("not a url", "t", Duration::from_secs(1));
        assert!(matches!(result, Err(GitHubError::InvalidUrl(_))));
    }
}
