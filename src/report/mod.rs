pub mod csv;
pub mod types;

pub use types::{AnalysisSummary, Artifacts, PrCommentCount, Report};

use crate::analysis::{Comment, CommentStats};
use crate::config::KeywordConfig;
use crate::pr::{PullRequest, RepoSlug};
use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

pub const CSV_FILE: &str = "results.csv";
pub const MARKDOWN_FILE: &str = "report.md";
pub const JSON_FILE: &str = "summary.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Bundle run metadata and statistics into a Report.
pub fn build(repo: &RepoSlug, prs: &[PullRequest], stats: CommentStats, keywords: &KeywordConfig) -> Report {
    let by_number: HashMap<u64, &PullRequest> = prs.iter().map(|pr| (pr.number, pr)).collect();
    let per_pr = stats
        .counts_per_pr
        .iter()
        .map(|(number, comments)| {
            let pr = by_number.get(&number);
            PrCommentCount {
                number,
                title: pr.map(|pr| pr.title.clone()).unwrap_or_default(),
                url: pr.map(|pr| pr.url.clone()).unwrap_or_default(),
                created_at: pr.map(|pr| pr.created_at.clone()).unwrap_or_default(),
                comments,
            }
        })
        .collect();

    Report {
        repo: repo.clone(),
        pr_count: prs.len(),
        stats,
        per_pr,
        keywords: keywords
            .patterns
            .iter()
            .chain(keywords.phrases.iter())
            .cloned()
            .collect(),
    }
}

/// Write results.csv, report.md and summary.json into `dir`, creating it
/// if needed.
#[instrument(skip(report, comments, prs, dir), fields(repo = %report.repo, dir = %dir.display()))]
pub fn write_artifacts(
    report: &Report,
    comments: &[Comment],
    prs: &[PullRequest],
    dir: &Path,
) -> Result<Artifacts, ReportError> {
    std::fs::create_dir_all(dir)?;

    let artifacts = Artifacts {
        csv: dir.join(CSV_FILE),
        markdown: dir.join(MARKDOWN_FILE),
        json: dir.join(JSON_FILE),
    };

    debug!(path = %artifacts.csv.display(), "writing CSV");
    std::fs::write(&artifacts.csv, csv::build(comments, prs))?;

    debug!(path = %artifacts.markdown.display(), "writing markdown report");
    std::fs::write(&artifacts.markdown, render_markdown(report))?;

    debug!(path = %artifacts.json.display(), "writing JSON summary");
    std::fs::write(&artifacts.json, render_json(&AnalysisSummary::from(report))?)?;

    Ok(artifacts)
}

pub fn render_json(summary: &AnalysisSummary) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Render the markdown report. Rounding happens here and nowhere else.
pub fn render_markdown(report: &Report) -> String {
    let stats = &report.stats;
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Pull Request Comment Analysis".to_string());
    lines.push(String::new());
    lines.push("**Repository:**".to_string());
    lines.push(format!("- {}", report.repo.html_url()));
    lines.push(String::new());
    lines.push("**How many comments were collected?**".to_string());
    lines.push(format!("- Total comments collected: **{}**", stats.total_comments));
    lines.push(String::new());
    lines.push(format!(
        "**Average number of comments per pull request ({} PRs sampled):**",
        report.pr_count
    ));
    lines.push(format!(
        "- Average (comments per PR): **{:.4}**",
        stats.avg_comments_per_pr
    ));
    lines.push(String::new());
    lines.push("**Average comment size:**".to_string());
    lines.push(format!("- Average size (characters): **{:.2}**", stats.avg_chars));
    lines.push(format!("- Average size (words): **{:.2}**", stats.avg_words));
    lines.push(String::new());
    lines.push("**How many comments contain a thanks keyword?**".to_string());
    lines.push(format!(
        "- Keywords searched (case-insensitive): {}",
        report.keywords.join(", ")
    ));
    lines.push(format!("- Comments with thanks: **{}**", stats.thanks_count));
    lines.push(String::new());

    if !report.per_pr.is_empty() {
        lines.push("## Comments per PR".to_string());
        lines.push(String::new());
        lines.push("| PR | Title | Created | Comments |".to_string());
        lines.push("|----|-------|---------|----------|".to_string());
        for row in &report.per_pr {
            let pr = if row.url.is_empty() {
                format!("#{}", row.number)
            } else {
                format!("[#{}]({})", row.number, row.url)
            };
            lines.push(format!(
                "| {} | {} | {} | {} |",
                pr,
                row.title.replace('|', "\\|"),
                row.created_at,
                row.comments
            ));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push("## Technical notes".to_string());
    lines.push(
        "- Collected comments include issue comments, review bodies (when a body exists) and review thread comments."
            .to_string(),
    );
    lines.push(format!(
        "- `{}` has two columns: pr_number, comments. All comments of a PR are joined with the `{}` separator and the field is quoted with embedded double quotes doubled; line breaks inside comments are replaced by spaces so each PR stays on one line.",
        CSV_FILE,
        csv::COMMENT_DELIMITER.trim()
    ));

    lines.join("\n")
}

/// Print a colored summary of the run to stdout.
pub fn print_terminal_summary(report: &Report, artifacts: &Artifacts) {
    let stats = &report.stats;
    println!();
    println!("{}", format!("═══ {} ═══", report.repo).bold());
    println!(
        "PRs analyzed: {} | Comments: {}",
        report.pr_count.to_string().cyan(),
        stats.total_comments.to_string().cyan()
    );
    println!("Avg comments per PR: {:.4}", stats.avg_comments_per_pr);
    println!(
        "Avg comment size: {:.2} chars, {:.2} words",
        stats.avg_chars, stats.avg_words
    );
    let thanks = stats.thanks_count.to_string();
    let thanks = if stats.thanks_count > 0 {
        thanks.green().bold()
    } else {
        thanks.yellow().bold()
    };
    println!("Comments with thanks: {}", thanks);
    println!();
    println!("  • {}", artifacts.csv.display());
    println!("  • {}", artifacts.markdown.display());
    println!("  • {}", artifacts.json.display());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::tests::{test_pull_request, with_issue_comments};
    use crate::analysis::CommentAnalyzer;

    fn sample() -> (Vec<PullRequest>, Vec<Comment>, Report) {
        let prs = vec![with_issue_comments(1, &["Thanks!"]), test_pull_request(2)];
        let keywords = KeywordConfig::default();
        let analyzer = CommentAnalyzer::new(&keywords).unwrap();
        let comments = analyzer.extract(&prs);
        let stats = analyzer.analyze(&comments, &prs);
        let repo = RepoSlug {
            owner: "org".to_string(),
            name: "repo".to_string(),
        };
        let report = build(&repo, &prs, stats, &keywords);
        (prs, comments, report)
    }

    #[test]
    fn test_build_report_metadata() {
        let (_, _, report) = sample();
        assert_eq!(report.pr_count, 2);
        assert_eq!(report.per_pr.len(), 2);
        assert_eq!(report.per_pr[0].number, 1);
        assert_eq!(report.per_pr[0].comments, 1);
        assert_eq!(report.per_pr[1].title, "PR 2");
        assert_eq!(report.per_pr[1].comments, 0);
        assert_eq!(report.keywords.len(), 7);
        assert_eq!(report.keywords[2], r"\btks\b");
    }

    #[test]
    fn test_render_markdown_rounds_for_display() {
        let (_, _, report) = sample();
        let md = render_markdown(&report);
        assert!(md.starts_with("# Pull Request Comment Analysis"));
        assert!(md.contains("- https://github.com/org/repo"));
        assert!(md.contains("Total comments collected: **1**"));
        assert!(md.contains("(2 PRs sampled)"));
        assert!(md.contains("**0.5000**"));
        assert!(md.contains("Average size (characters): **7.00**"));
        assert!(md.contains("Average size (words): **1.00**"));
        assert!(md.contains("Comments with thanks: **1**"));
        assert!(md.contains("thank you, thanks, \\btks\\b"));
        assert!(md.contains("`|||`"));
        assert!(md.contains("| [#1](https://github.com/org/repo/pull/1) | PR 1 | 2024-01-01T00:00:00Z | 1 |"));
        assert!(md.contains("| [#2](https://github.com/org/repo/pull/2) | PR 2 | 2024-01-01T00:00:00Z | 0 |"));
    }

    #[test]
    fn test_markdown_escapes_pipes_in_titles() {
        let (_, _, mut report) = sample();
        report.per_pr[0].title = "a | b".to_string();
        assert!(render_markdown(&report).contains("| a \\| b |"));
    }

    #[test]
    fn test_render_json_is_unrounded() {
        let (_, _, mut report) = sample();
        report.stats.avg_chars = 1.0 / 3.0;
        let json = render_json(&AnalysisSummary::from(&report)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["avgChars"].as_f64(), Some(1.0 / 3.0));
        assert_eq!(value["prCount"], 2);
    }

    #[test]
    fn test_write_artifacts() {
        let (prs, comments, report) = sample();
        let dir = std::env::temp_dir().join("pr-comments-analyzer-artifacts-test");
        std::fs::remove_dir_all(&dir).ok();

        let artifacts = write_artifacts(&report, &comments, &prs, &dir).unwrap();
        assert_eq!(artifacts.csv, dir.join("results.csv"));

        let csv = std::fs::read_to_string(&artifacts.csv).unwrap();
        assert_eq!(csv, "pr_number,comments\n1,\"Thanks!\"\n2,\"\"");

        let md = std::fs::read_to_string(&artifacts.markdown).unwrap();
        assert!(md.contains("Comments with thanks: **1**"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&artifacts.json).unwrap()).unwrap();
        assert_eq!(json["totalComments"], 1);
        assert_eq!(json["avgCommentsPerPR"], 0.5);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_terminal_summary_does_not_panic() {
        let (_, _, report) = sample();
        let artifacts = Artifacts {
            csv: "out/results.csv".into(),
            markdown: "out/report.md".into(),
            json: "out/summary.json".into(),
        };
        print_terminal_summary(&report, &artifacts);
    }
}
