use serde::{Deserialize, Serialize};

use super::types::{null_as_empty, PullRequest, RepoSlug};
use super::PrError;

/// Most recently created pull requests with one page of each comment source.
pub const PULL_REQUESTS_QUERY: &str = r#"
query($owner: String!, $name: String!, $prLimit: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $prLimit, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes {
        number
        title
        url
        createdAt
        comments(first: 50) {
          nodes { id body createdAt author { login } }
        }
        reviews(first: 50) {
          nodes { id body createdAt author { login } }
        }
        reviewThreads(first: 50) {
          nodes {
            comments(first: 50) {
              nodes { id body createdAt author { login } }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub pr_limit: u32,
}

pub fn build_request(repo: &RepoSlug, limit: u32) -> GraphQlRequest<'_> {
    GraphQlRequest {
        query: PULL_REQUESTS_QUERY,
        variables: Variables {
            owner: &repo.owner,
            name: &repo.name,
            pr_limit: limit,
        },
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
struct PullRequestConnection {
    #[serde(default, deserialize_with = "null_as_empty")]
    nodes: Vec<Option<PullRequest>>,
}

/// Decode a GraphQL response body into the pull request list.
///
/// Any entry in `errors` fails the whole response, even when partial data
/// came back alongside it.
pub fn parse_response(body: &str, repo: &RepoSlug) -> Result<Vec<PullRequest>, PrError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(PrError::GraphQl(messages.join("; ")));
    }

    let data = response
        .data
        .ok_or_else(|| PrError::GraphQl("response carried no data".to_string()))?;
    let repository = data
        .repository
        .ok_or_else(|| PrError::RepositoryNotFound(repo.to_string()))?;

    Ok(repository
        .pull_requests
        .nodes
        .into_iter()
        .flatten()
        .collect())
}
