//! Summary insights.
//!
//! Headline numbers for a filtered view: the key-metric row (repositories,
//! commits, contributors, commits/day, stars) and the most-active
//! repository/contributor/weekday/hour highlights.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::temporal::WEEKDAY_NAMES;

/// Headline numbers for the filtered view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Filtered repository count.
    pub repositories: u64,
    /// Total commits, org-wide (orphans included).
    pub commits: u64,
    /// Distinct commit authors.
    pub contributors: u64,
    /// Average commits per day over the analysis span.
    pub commits_per_day: f64,
    /// Stars summed over the filtered repositories.
    pub stars: u64,
}

/// Key metrics of the filtered view.
///
/// The commits/day span is the filter's date range when both bounds are
/// set, otherwise the observed first-to-last commit span; always at least
/// one day.
pub fn key_metrics(view: &FilteredView) -> KeyMetrics {
    let authors: HashSet<&str> = view.commits.iter().map(|c| c.author.as_str()).collect();
    let commits = view.total_commits() as u64;

    let span_days = match (view.spec.since, view.spec.until) {
        (Some(since), Some(until)) => (until - since).num_days().max(1),
        _ => {
            let first = view.commits.first().map(|c| c.day());
            let last = view.commits.last().map(|c| c.day());
            match (first, last) {
                (Some(first), Some(last)) => (last - first).num_days().max(1),
                _ => 1,
            }
        }
    };

    KeyMetrics {
        repositories: view.repos.len() as u64,
        commits,
        contributors: authors.len() as u64,
        commits_per_day: commits as f64 / span_days as f64,
        stars: view.repos.iter().map(|r| r.stars).sum(),
    }
}

/// One most-active highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// The repository, author, weekday, or hour label.
    pub name: String,
    /// Its commit count.
    pub commits: u64,
    /// Its share of the filtered total, percent.
    pub share_pct: f64,
}

/// The most-active highlights of a filtered view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    /// Repository with the most commits.
    pub top_repo: Highlight,
    /// Author with the most commits.
    pub top_contributor: Highlight,
    /// Weekday with the most commits.
    pub top_weekday: Highlight,
    /// Hour of day with the most commits, labeled `HH:00`.
    pub top_hour: Highlight,
}

/// Most-active highlights, or `None` for an empty view.
///
/// Ties go to the first-seen repository/author and the earliest
/// weekday/hour.
pub fn highlights(view: &FilteredView) -> Option<Highlights> {
    if view.is_empty() {
        return None;
    }
    let total = view.total_commits() as u64;

    let top_repo = top_by_key(view, |c| c.repo_name.as_str(), total)?;
    let top_contributor = top_by_key(view, |c| c.author.as_str(), total)?;

    let mut weekday_counts = [0u64; 7];
    let mut hour_counts = [0u64; 24];
    for commit in &view.commits {
        weekday_counts[commit.weekday().num_days_from_monday() as usize] += 1;
        hour_counts[commit.hour() as usize] += 1;
    }
    let weekday_idx = max_index(&weekday_counts);
    let hour_idx = max_index(&hour_counts);

    Some(Highlights {
        top_repo,
        top_contributor,
        top_weekday: Highlight {
            name: WEEKDAY_NAMES[weekday_idx].into(),
            commits: weekday_counts[weekday_idx],
            share_pct: 100.0 * weekday_counts[weekday_idx] as f64 / total as f64,
        },
        top_hour: Highlight {
            name: format!("{hour_idx:02}:00"),
            commits: hour_counts[hour_idx],
            share_pct: 100.0 * hour_counts[hour_idx] as f64 / total as f64,
        },
    })
}

fn top_by_key<'a>(
    view: &FilteredView<'a>,
    key: impl Fn(&'a orgpulse_core::Commit) -> &'a str,
    total: u64,
) -> Option<Highlight> {
    let mut tally: HashMap<&str, (u64, usize)> = HashMap::new();
    for (seen, &commit) in view.commits.iter().enumerate() {
        let entry = tally.entry(key(commit)).or_insert((0, seen));
        entry.0 += 1;
    }
    tally
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(name, (commits, _))| Highlight {
            name: name.into(),
            commits,
            share_pct: 100.0 * commits as f64 / total as f64,
        })
}

fn max_index(counts: &[u64]) -> usize {
    let mut best = 0;
    for (idx, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = idx;
        }
    }
    best
}
