use crate::config::AppConfig;
use crate::error::{MilestoneError, Result};
use crate::metrics::MetricSet;
use crate::types::RepoId;
use octocrab::service::middleware::retry::RetryConfig;
use http::Uri;
use octocrab::Octocrab;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::Value;

/// Everything outside the RFC 3986 unreserved set is escaped inside a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escapes one path segment. A segment made only of dots is escaped in full so it is
/// never read as `.` or `..`.
fn encode_segment(segment: &str) -> String {
    if !segment.is_empty() && segment.chars().all(|c| c == '.') {
        return "%2E".repeat(segment.len());
    }
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Builds the request URI for `route` below the repository.
fn repo_route(repo_id: &RepoId, route: &str) -> Result<Uri> {
    let path = format!(
        "/repos/{}/{}{route}",
        encode_segment(&repo_id.owner),
        encode_segment(&repo_id.repo)
    );
    path.parse::<Uri>()
        .map_err(|e| MilestoneError::input(format!("Invalid repository {repo_id}: {e}")))
}

/// Counters read from the `GET /repos/{owner}/{repo}` payload.
///
/// Any of them may be missing; a missing counter reads as zero.
#[derive(Debug, Deserialize)]
struct RepoCounters {
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    open_issues_count: Option<u64>,
    watchers_count: Option<u64>,
}

pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Builds an unauthenticated client against `config.github_api_url`.
    ///
    /// Retries are switched off so that the first failed call ends the fetch.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = Some(config.request_timeout());
        let octocrab = Octocrab::builder()
            .base_uri(config.github_api_url.as_str())?
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(timeout)
            .set_read_timeout(timeout)
            .build()?;

        Ok(Self { octocrab })
    }

    /// Fetches the six metrics for a repository with three sequential calls.
    ///
    /// Pull requests and commits are counted from the first page only.
    pub async fn fetch_metrics(&self, repo_id: &RepoId) -> Result<MetricSet> {
        let (status, body) = self.get(repo_route(repo_id, "")?).await?;
        match status {
            200 => {}
            404 => return Err(MilestoneError::NotFound),
            403 => return Err(MilestoneError::RateLimited),
            other => return Err(MilestoneError::Upstream(other)),
        }
        let counters = parse_counters(&body)?;

        let pull_requests = self
            .count_first_page(repo_route(repo_id, "/pulls?state=all")?)
            .await?;
        let commits = self
            .count_first_page(repo_route(repo_id, "/commits")?)
            .await?;

        let metrics = MetricSet {
            stars: counters.stargazers_count.unwrap_or(0),
            forks: counters.forks_count.unwrap_or(0),
            open_issues: counters.open_issues_count.unwrap_or(0),
            watchers: counters.watchers_count.unwrap_or(0),
            pull_requests,
            commits,
        };
        tracing::debug!(repo_id = %repo_id, ?metrics, "Fetched repository metrics");

        Ok(metrics)
    }

    /// Counts the items of a list endpoint. Only a 403 is treated as an error.
    async fn count_first_page(&self, route: Uri) -> Result<u64> {
        let path = route.to_string();
        let (status, body) = self.get(route).await?;
        if status == 403 {
            return Err(MilestoneError::RateLimited);
        }
        count_items(&path, status, &body)
    }

    /// Issues a single GET and returns the status code with the raw body.
    async fn get(&self, route: Uri) -> Result<(u16, String)> {
        tracing::debug!(route = %route, "GET");
        let response = self
            .octocrab
            ._get(route.clone())
            .await
            .map_err(network_error)?;
        let status = response.status().as_u16();
        let body = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(network_error)?;
        tracing::debug!(route = %route, status = status, "Response received");

        Ok((status, body))
    }
}

fn network_error(err: octocrab::Error) -> MilestoneError {
    MilestoneError::Network(err.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| MilestoneError::MalformedResponse(e.to_string()))
}

fn parse_counters(body: &str) -> Result<RepoCounters> {
    parse_json(body)
}

fn count_items(route: &str, status: u16, body: &str) -> Result<u64> {
    match parse_json::<Value>(body)? {
        Value::Array(items) => Ok(items.len() as u64),
        _ => {
            tracing::warn!(route = %route, status = status, "Expected a JSON list, counting it as empty");
            Ok(0)
        }
    }
}
