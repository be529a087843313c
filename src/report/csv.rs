use std::collections::HashMap;

use crate::analysis::stats::is_space;
use crate::analysis::Comment;
use crate::pr::PullRequest;

pub const HEADER: &str = "pr_number,comments";

/// Separator placed between the comments of one PR.
pub const COMMENT_DELIMITER: &str = " ||| ";

/// One row per PR in PR-list order: the number, then every comment of that
/// PR on a single line. PRs without comments get an empty quoted field.
pub fn build(comments: &[Comment], prs: &[PullRequest]) -> String {
    let mut by_pr: HashMap<u64, Vec<&str>> = HashMap::new();
    for comment in comments {
        by_pr
            .entry(comment.pr_number)
            .or_default()
            .push(comment.body.as_str());
    }

    let mut lines = Vec::with_capacity(prs.len() + 1);
    lines.push(HEADER.to_string());
    for pr in prs {
        let bodies = by_pr.get(&pr.number).map(Vec::as_slice).unwrap_or(&[]);
        lines.push(format!("{},{}", pr.number, escape_field(&join_bodies(bodies))));
    }
    lines.join("\n")
}

fn join_bodies(bodies: &[&str]) -> String {
    bodies
        .iter()
        .map(|body| flatten(body).trim_matches(is_space).to_string())
        .collect::<Vec<_>>()
        .join(COMMENT_DELIMITER)
}

/// Replace line breaks with spaces.
pub fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

/// Quote a field, doubling embedded quotes.
pub fn escape_field(field: &str) -> String {
    format!("\"{}\"", flatten(field).replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::extract_comments;
    use crate::analysis::extract::tests::{test_pull_request, with_issue_comments};

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "\"plain\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("a\r\nb\nc"), "\"a b c\"");
        assert_eq!(escape_field(""), "\"\"");
    }

    #[test]
    fn test_rows_in_pr_order_with_empty_prs() {
        let prs = vec![
            with_issue_comments(3, &["first\nline", "  second  "]),
            test_pull_request(2),
            with_issue_comments(1, &["x, \"quoted\""]),
        ];
        let comments = extract_comments(&prs);
        let csv = build(&comments, &prs);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "pr_number,comments");
        assert_eq!(lines[1], "3,\"first line ||| second\"");
        assert_eq!(lines[2], "2,\"\"");
        assert_eq!(lines[3], "1,\"x, \"\"quoted\"\"\"");
        assert_eq!(lines.len(), 4);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_trims_byte_order_marks() {
        let prs = vec![with_issue_comments(1, &["\u{feff}valeu\u{feff}", "ok"])];
        let csv = build(&extract_comments(&prs), &prs);
        assert_eq!(csv, "pr_number,comments\n1,\"valeu ||| ok\"");
    }

    #[test]
    fn test_header_only_for_empty_batch() {
        assert_eq!(build(&[], &[]), HEADER);
    }
}
