use crate::pr::types::{Connection, RawCommentNode};
use crate::pr::PullRequest;

/// Which part of the PR conversation a comment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSource {
    /// Top-level conversation comment
    Issue,
    /// Body of a submitted review
    Review,
    /// Inline comment inside a review thread
    ReviewThread,
}

impl CommentSource {
    /// Every source, in extraction order.
    pub const ALL: [CommentSource; 3] = [
        CommentSource::Issue,
        CommentSource::Review,
        CommentSource::ReviewThread,
    ];
}

impl std::fmt::Display for CommentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentSource::Issue => write!(f, "issue"),
            CommentSource::Review => write!(f, "review"),
            CommentSource::ReviewThread => write!(f, "reviewThread"),
        }
    }
}

/// A flattened comment. `body` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub pr_number: u64,
    /// GraphQL node id
    pub id: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub source: CommentSource,
}

/// Flatten every PR in order. Output is PR order outer, source order inner.
pub fn extract_comments(prs: &[PullRequest]) -> Vec<Comment> {
    prs.iter().flat_map(extract_from_pull_request).collect()
}

/// Issue comments, then review bodies, then review-thread comments (thread
/// by thread). Nodes whose body is missing or empty are skipped.
pub fn extract_from_pull_request(pr: &PullRequest) -> Vec<Comment> {
    let mut comments = Vec::new();

    push_nodes(&mut comments, pr.number, pr.comments.as_ref(), CommentSource::Issue);
    push_nodes(&mut comments, pr.number, pr.reviews.as_ref(), CommentSource::Review);

    if let Some(threads) = &pr.review_threads {
        for thread in threads.iter() {
            push_nodes(
                &mut comments,
                pr.number,
                thread.comments.as_ref(),
                CommentSource::ReviewThread,
            );
        }
    }

    comments
}

fn push_nodes(
    out: &mut Vec<Comment>,
    pr_number: u64,
    connection: Option<&Connection<RawCommentNode>>,
    source: CommentSource,
) {
    let Some(connection) = connection else {
        return;
    };
    for node in connection.iter() {
        let body = match node.body.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => continue,
        };
        out.push(Comment {
            pr_number,
            id: node.id.clone(),
            body: body.to_string(),
            author: node.author.as_ref().map(|a| a.login.clone()),
            created_at: node.created_at.clone(),
            source,
        });
    }
}
