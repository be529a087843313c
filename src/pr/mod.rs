pub mod graphql;
pub mod types;

pub use types::{PullRequest, RepoSlug};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API error: {status} {body}")]
    ApiStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("Failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid repository: {0} (expected owner/name or https://github.com/owner/name)")]
    InvalidRepo(String),

    #[error("GitHub token not found. Set GITHUB_TOKEN or github.token in the config file")]
    MissingToken,
}

/// Parse `owner/name` or a github.com repository URL.
pub fn parse_repo_slug(input: &str) -> Result<RepoSlug, PrError> {
    let input = input.trim();
    let invalid = || PrError::InvalidRepo(input.to_string());

    let segments: Vec<String> = if input.contains("://") {
        let parsed = reqwest::Url::parse(input).map_err(|_| invalid())?;
        if parsed.host_str() != Some("github.com") {
            return Err(invalid());
        }
        parsed
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string())
            .collect()
    } else {
        input.split('/').map(|segment| segment.to_string()).collect()
    };

    if segments.len() != 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(invalid());
    }

    let name = segments[1].trim_end_matches(".git").to_string();
    if name.is_empty() {
        return Err(invalid());
    }

    Ok(RepoSlug {
        owner: segments[0].clone(),
        name,
    })
}

/// Where pull requests come from: the live API or an embedded fixture.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Human-readable name of this source, used in logs
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recently created pull requests.
    async fn fetch_pull_requests(
        &self,
        repo: &RepoSlug,
        limit: u32,
    ) -> Result<Vec<PullRequest>, PrError>;
}

/// GitHub GraphQL API client. One request per run, no retries.
pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: &crate::config::Config) -> Result<Self, PrError> {
        let token = config.github_token().ok_or(PrError::MissingToken)?;
        Ok(Self {
            client: reqwest::Client::new(),
            token,
            api_url: config.github.api_url.clone(),
        })
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    fn name(&self) -> &str {
        "GitHub GraphQL API"
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn fetch_pull_requests(
        &self,
        repo: &RepoSlug,
        limit: u32,
    ) -> Result<Vec<PullRequest>, PrError> {
        let request = graphql::build_request(repo, limit);

        debug!(api_url = %self.api_url, "posting GraphQL query");
        let response = self
            .client
            .post(&self.api_url)
            .header("User-Agent", "pr-comments-analyzer")
            .header("Authorization", format!("bearer {}", self.token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, response_bytes = body.len(), "received GraphQL response");

        if !status.is_success() {
            return Err(PrError::ApiStatus { status, body });
        }

        let pull_requests = graphql::parse_response(&body, repo)?;
        debug!(pull_requests = pull_requests.len(), "decoded pull requests");
        Ok(pull_requests)
    }
}

/// Replays a recorded GraphQL response. Backs `--mock` so the pipeline can
/// run without a GitHub token.
pub struct FixtureSource {
    body: &'static str,
}

impl FixtureSource {
    pub fn new(body: &'static str) -> Self {
        Self { body }
    }

    /// The sample response bundled with the binary.
    pub fn bundled() -> Self {
        Self::new(include_str!("../../tests/fixtures/sample_pull_requests.json"))
    }
}

#[async_trait]
impl PullRequestSource for FixtureSource {
    fn name(&self) -> &str {
        "bundled fixture"
    }

    async fn fetch_pull_requests(
        &self,
        repo: &RepoSlug,
        limit: u32,
    ) -> Result<Vec<PullRequest>, PrError> {
        let mut pull_requests = graphql::parse_response(self.body, repo)?;
        pull_requests.truncate(limit as usize);
        Ok(pull_requests)
    }
}
