use std::collections::HashMap;

use super::extract::Comment;
use super::keywords::KeywordMatcher;
use crate::pr::PullRequest;

/// Comment count per PR number, in PR-list order.
///
/// Every PR of the input list has an entry, zero included. A comment that
/// points at a PR outside the list gets an entry appended after them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerPrCounts {
    entries: Vec<(u64, usize)>,
}

impl PerPrCounts {
    pub fn tally(comments: &[Comment], prs: &[PullRequest]) -> Self {
        let mut entries: Vec<(u64, usize)> = Vec::with_capacity(prs.len());
        let mut index: HashMap<u64, usize> = HashMap::with_capacity(prs.len());

        for pr in prs {
            index.entry(pr.number).or_insert_with(|| {
                entries.push((pr.number, 0));
                entries.len() - 1
            });
        }

        for comment in comments {
            let slot = *index.entry(comment.pr_number).or_insert_with(|| {
                entries.push((comment.pr_number, 0));
                entries.len() - 1
            });
            entries[slot].1 += 1;
        }

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Aggregates over one fetched batch. Averages are left unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStats {
    pub total_comments: usize,
    pub avg_comments_per_pr: f64,
    pub avg_chars: f64,
    pub avg_words: f64,
    pub thanks_count: usize,
    pub counts_per_pr: PerPrCounts,
}

pub fn compute(comments: &[Comment], prs: &[PullRequest], matcher: &KeywordMatcher) -> CommentStats {
    let counts_per_pr = PerPrCounts::tally(comments, prs);

    let avg_comments_per_pr = if counts_per_pr.is_empty() {
        0.0
    } else {
        counts_per_pr.total() as f64 / counts_per_pr.len() as f64
    };

    let (avg_chars, avg_words) = if comments.is_empty() {
        (0.0, 0.0)
    } else {
        let total_chars: usize = comments.iter().map(|c| char_length(&c.body)).sum();
        let total_words: usize = comments.iter().map(|c| word_count(&c.body)).sum();
        let n = comments.len() as f64;
        (total_chars as f64 / n, total_words as f64 / n)
    };

    let thanks_count = comments.iter().filter(|c| matcher.matches(&c.body)).count();

    CommentStats {
        total_comments: comments.len(),
        avg_comments_per_pr,
        avg_chars,
        avg_words,
        thanks_count,
        counts_per_pr,
    }
}

/// Unicode whitespace plus the byte order mark.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Whitespace-separated tokens; blank text has none.
pub fn word_count(text: &str) -> usize {
    text.split(is_space).filter(|word| !word.is_empty()).count()
}

/// Length in UTF-16 code units.
pub fn char_length(text: &str) -> usize {
    text.encode_utf16().count()
}
