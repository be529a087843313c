use serde::{Deserialize, Deserializer};

/// A pull request as returned by the GraphQL `pullRequests` connection.
///
/// Each nested collection may be missing from the response, and GraphQL is
/// allowed to put `null` entries inside `nodes`; both contribute nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title
    #[serde(default)]
    pub title: String,
    /// HTML URL of the PR
    #[serde(default)]
    pub url: String,
    /// ISO-8601 creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Issue-style conversation comments
    #[serde(default)]
    pub comments: Option<Connection<RawCommentNode>>,
    /// Review submissions; the review body is the comment
    #[serde(default)]
    pub reviews: Option<Connection<RawCommentNode>>,
    /// Inline review threads
    #[serde(default)]
    pub review_threads: Option<Connection<ReviewThread>>,
}

/// A GraphQL connection trimmed down to its `nodes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Option<T>>,
}

/// `nodes` is a nullable list in GitHub's schema; read `null` as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> Connection<T> {
    /// Present nodes in response order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().flatten()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewThread {
    #[serde(default)]
    pub comments: Option<Connection<RawCommentNode>>,
}

/// A comment-like node: issue comment, review or review-thread comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommentNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Null when the author account was deleted
    #[serde(default)]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub login: String,
}

/// Repository coordinates, parsed by parse_repo_slug() in pr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
