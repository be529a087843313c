pub mod extract;
pub mod keywords;
pub mod stats;

pub use extract::Comment;
pub use keywords::KeywordMatcher;
pub use stats::CommentStats;

use thiserror::Error;
use tracing::debug;

use crate::config::KeywordConfig;
use crate::pr::PullRequest;
use extract::CommentSource;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid thanks keyword pattern `{pattern}`: {source}")]
    InvalidKeyword {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Flattens PR conversations and aggregates them.
///
/// The keyword matcher is compiled once at construction, so a bad pattern
/// stops the run before anything is fetched.
#[derive(Debug, Clone)]
pub struct CommentAnalyzer {
    matcher: KeywordMatcher,
}

impl CommentAnalyzer {
    pub fn new(keywords: &KeywordConfig) -> Result<Self, AnalysisError> {
        let matcher = KeywordMatcher::from_config(keywords)?;
        debug!(pattern = %matcher.as_str(), "compiled thanks keyword pattern");
        Ok(Self { matcher })
    }

    pub fn extract(&self, prs: &[PullRequest]) -> Vec<Comment> {
        let comments = extract::extract_comments(prs);
        for source in CommentSource::ALL {
            let count = comments.iter().filter(|c| c.source == source).count();
            debug!(source = %source, comments = count, "extracted comments by source");
        }
        comments
    }

    pub fn analyze(&self, comments: &[Comment], prs: &[PullRequest]) -> CommentStats {
        let stats = stats::compute(comments, prs, &self.matcher);
        debug!(
            total = stats.total_comments,
            per_pr_entries = stats.counts_per_pr.len(),
            thanks = stats.thanks_count,
            "computed comment statistics"
        );
        stats
    }
}
