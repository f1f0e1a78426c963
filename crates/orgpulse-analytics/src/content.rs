//! Commit-content reports.
//!
//! Aggregations over classification labels: the label breakdown with its
//! Unclassified complement, monthly development-focus trends, per-repository
//! focus shares, and the recent-commit listing. Everything here needs commit
//! messages, so constructors return `None` when the store has none — the
//! missing-data path is visible in the signature instead of silently
//! producing empty charts.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, Label};
use crate::filter::FilteredView;

/// The four labels tracked in focus-over-time comparisons.
pub const FOCUS_LABELS: [Label; 4] = [Label::Feature, Label::BugFix, Label::Refactor, Label::Docs];

/// Commit count for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// The label.
    pub label: Label,
    /// Commits carrying it.
    pub commits: u64,
}

/// Commit counts per label over the filtered view.
///
/// Labels are not mutually exclusive, so the per-label counts can sum to
/// more than `total`; `unclassified` counts the commits matching no pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBreakdown {
    /// Count per label, in canonical label order.
    pub counts: Vec<LabelCount>,
    /// Commits matching no pattern.
    pub unclassified: u64,
    /// Total commits in the view.
    pub total: u64,
}

/// Label breakdown of the filtered view, or `None` without message data.
pub fn label_breakdown(view: &FilteredView, classifier: &mut Classifier) -> Option<LabelBreakdown> {
    if !view.capabilities.has_message {
        return None;
    }
    let mut per_label: HashMap<Label, u64> = HashMap::new();
    let mut unclassified = 0u64;
    for commit in &view.commits {
        let labels = classifier.labels(commit);
        if labels.is_empty() {
            unclassified += 1;
        }
        for &label in labels.iter() {
            *per_label.entry(label).or_default() += 1;
        }
    }
    Some(LabelBreakdown {
        counts: Label::ALL
            .iter()
            .map(|&label| LabelCount {
                label,
                commits: per_label.get(&label).copied().unwrap_or(0),
            })
            .collect(),
        unclassified,
        total: view.total_commits() as u64,
    })
}

/// Commit count for one (month, focus label) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFocus {
    /// Calendar month label, `YYYY-MM`.
    pub month: String,
    /// One of [`FOCUS_LABELS`].
    pub label: Label,
    /// Commits carrying the label in that month.
    pub commits: u64,
}

/// Development-focus trend by month, or `None` without message data.
///
/// Months ascend chronologically; within a month, labels follow
/// [`FOCUS_LABELS`] order.
pub fn monthly_focus(view: &FilteredView, classifier: &mut Classifier) -> Option<Vec<MonthlyFocus>> {
    if !view.capabilities.has_message {
        return None;
    }
    let mut months: BTreeMap<String, [u64; FOCUS_LABELS.len()]> = BTreeMap::new();
    for commit in &view.commits {
        let day = commit.day();
        let month = format!("{:04}-{:02}", day.year(), day.month());
        let labels = classifier.labels(commit);
        let bucket = months.entry(month).or_default();
        for (idx, label) in FOCUS_LABELS.iter().enumerate() {
            if labels.contains(label) {
                bucket[idx] += 1;
            }
        }
    }
    Some(
        months
            .into_iter()
            .flat_map(|(month, bucket)| {
                FOCUS_LABELS
                    .iter()
                    .enumerate()
                    .map(move |(idx, &label)| MonthlyFocus {
                        month: month.clone(),
                        label,
                        commits: bucket[idx],
                    })
                    .collect::<Vec<_>>()
            })
            .collect(),
    )
}

/// Focus share for one (repository, focus label) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFocus {
    /// Repository name.
    pub repo: String,
    /// One of [`FOCUS_LABELS`].
    pub label: Label,
    /// Percentage of the repository's filtered commits carrying the label.
    pub share_pct: f64,
}

/// Per-repository development focus, or `None` without message data.
///
/// Repositories without commits in the view are omitted; repositories
/// appear in name order, each with one entry per focus label.
pub fn repo_focus(view: &FilteredView, classifier: &mut Classifier) -> Option<Vec<RepoFocus>> {
    if !view.capabilities.has_message {
        return None;
    }
    let selected: HashSet<&str> = view.repos.iter().map(|r| r.name.as_str()).collect();
    let mut per_repo: BTreeMap<&str, (u64, [u64; FOCUS_LABELS.len()])> = BTreeMap::new();
    for commit in &view.commits {
        let repo = commit.repo_name.as_str();
        if !selected.contains(repo) {
            continue;
        }
        let labels = classifier.labels(commit);
        let (total, bucket) = per_repo.entry(repo).or_default();
        *total += 1;
        for (idx, label) in FOCUS_LABELS.iter().enumerate() {
            if labels.contains(label) {
                bucket[idx] += 1;
            }
        }
    }
    Some(
        per_repo
            .into_iter()
            .flat_map(|(repo, (total, bucket))| {
                FOCUS_LABELS
                    .iter()
                    .enumerate()
                    .map(move |(idx, &label)| RepoFocus {
                        repo: repo.into(),
                        label,
                        share_pct: 100.0 * bucket[idx] as f64 / total as f64,
                    })
                    .collect::<Vec<_>>()
            })
            .collect(),
    )
}

/// One entry of the recent-commit listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCommit {
    /// Commit timestamp.
    pub date: DateTime<FixedOffset>,
    /// Repository name.
    pub repo: String,
    /// Author name.
    pub author: String,
    /// Commit message.
    pub message: String,
}

/// The `n` most recent commits carrying a message, newest first.
///
/// `None` without message data. Equal timestamps keep the view's stable
/// order.
pub fn recent_commits(view: &FilteredView, n: usize) -> Option<Vec<RecentCommit>> {
    if !view.capabilities.has_message {
        return None;
    }
    let mut with_message: Vec<_> = view
        .commits
        .iter()
        .filter(|c| c.message.is_some())
        .collect();
    with_message.sort_by(|a, b| b.date.cmp(&a.date));
    Some(
        with_message
            .into_iter()
            .take(n)
            .map(|c| RecentCommit {
                date: c.date,
                repo: c.repo_name.clone(),
                author: c.author.clone(),
                message: c.message.clone().unwrap_or_default(),
            })
            .collect(),
    )
}
