use serde::Serialize;
use std::path::PathBuf;

use crate::analysis::CommentStats;
use crate::pr::RepoSlug;

/// Everything the report writers need about one run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Repository the PRs were fetched from
    pub repo: RepoSlug,
    /// Number of PRs in the fetched batch
    pub pr_count: usize,
    /// Aggregates over the batch
    pub stats: CommentStats,
    /// One row per PR, in PR-list order
    pub per_pr: Vec<PrCommentCount>,
    /// Thanks keywords as configured, for display
    pub keywords: Vec<String>,
}

/// Comment count of a single PR alongside its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCommentCount {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub created_at: String,
    pub comments: usize,
}

/// Flat projection of a run, written as summary.json.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub repo: String,
    pub pr_count: usize,
    pub total_comments: usize,
    #[serde(rename = "avgCommentsPerPR")]
    pub avg_comments_per_pr: f64,
    pub avg_chars: f64,
    pub avg_words: f64,
    pub thanks_count: usize,
}

impl From<&Report> for AnalysisSummary {
    fn from(report: &Report) -> Self {
        Self {
            repo: report.repo.html_url(),
            pr_count: report.pr_count,
            total_comments: report.stats.total_comments,
            avg_comments_per_pr: report.stats.avg_comments_per_pr,
            avg_chars: report.stats.avg_chars,
            avg_words: report.stats.avg_words,
            thanks_count: report.stats.thanks_count,
        }
    }
}

/// Paths of the files written for one run.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub csv: PathBuf,
    pub markdown: PathBuf,
    pub json: PathBuf,
}
