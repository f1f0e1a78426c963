//! Repository statistics and comparison.
//!
//! Commit activity and development intensity per repository, popularity
//! rankings, language distribution, and the creation timeline.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;

/// Commit activity for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoActivity {
    /// Repository name.
    pub repo: String,
    /// Commits in the filtered view.
    pub commits: u64,
    /// Inclusive day span between the repository's first and last filtered
    /// commit; zero when it has no commits.
    pub active_days: u64,
    /// `commits / active_days` — development intensity.
    pub commits_per_day: f64,
}

/// Per-repository activity, descending by commit count then name.
///
/// Every filtered repository is reported, zero-filled when it has no commits
/// in the view. Orphan commits contribute to no repository.
pub fn repo_activity(view: &FilteredView) -> Vec<RepoActivity> {
    let mut stats: HashMap<&str, (u64, Option<(NaiveDate, NaiveDate)>)> = view
        .repos
        .iter()
        .map(|r| (r.name.as_str(), (0, None)))
        .collect();
    for commit in &view.commits {
        if let Some((count, span)) = stats.get_mut(commit.repo_name.as_str()) {
            *count += 1;
            let day = commit.day();
            *span = match *span {
                None => Some((day, day)),
                Some((first, last)) => Some((first.min(day), last.max(day))),
            };
        }
    }

    let mut activity: Vec<RepoActivity> = stats
        .into_iter()
        .map(|(repo, (commits, span))| {
            let active_days =
                span.map_or(0, |(first, last)| (last - first).num_days() as u64 + 1);
            let commits_per_day = if active_days == 0 {
                0.0
            } else {
                commits as f64 / active_days as f64
            };
            RepoActivity {
                repo: repo.into(),
                commits,
                active_days,
                commits_per_day,
            }
        })
        .collect();
    activity.sort_by(|a, b| b.commits.cmp(&a.commits).then(a.repo.cmp(&b.repo)));
    activity
}

/// Star count for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRank {
    /// Repository name.
    pub repo: String,
    /// Star count.
    pub stars: u64,
}

/// Filtered repositories by star count, descending.
pub fn star_ranking(view: &FilteredView) -> Vec<StarRank> {
    let mut ranked: Vec<StarRank> = view
        .repos
        .iter()
        .map(|r| StarRank {
            repo: r.name.clone(),
            stars: r.stars,
        })
        .collect();
    ranked.sort_by(|a, b| b.stars.cmp(&a.stars).then(a.repo.cmp(&b.repo)));
    ranked
}

/// Fork count for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkRank {
    /// Repository name.
    pub repo: String,
    /// Fork count.
    pub forks: u64,
}

/// Filtered repositories by fork count, descending.
pub fn fork_ranking(view: &FilteredView) -> Vec<ForkRank> {
    let mut ranked: Vec<ForkRank> = view
        .repos
        .iter()
        .map(|r| ForkRank {
            repo: r.name.clone(),
            forks: r.forks,
        })
        .collect();
    ranked.sort_by(|a, b| b.forks.cmp(&a.forks).then(a.repo.cmp(&b.repo)));
    ranked
}

/// Repository count for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    /// Language name, `"Unknown"` for repositories without one.
    pub language: String,
    /// Repositories using it.
    pub repos: u64,
}

/// Language distribution over the filtered repositories, descending by
/// count.
///
/// `None` when the store has no language data at all.
pub fn language_distribution(view: &FilteredView) -> Option<Vec<LanguageShare>> {
    if !view.capabilities.has_language {
        return None;
    }
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for repo in &view.repos {
        *counts.entry(repo.language_or_unknown()).or_default() += 1;
    }
    let mut shares: Vec<LanguageShare> = counts
        .into_iter()
        .map(|(language, repos)| LanguageShare {
            language: language.into(),
            repos,
        })
        .collect();
    shares.sort_by(|a, b| b.repos.cmp(&a.repos).then(a.language.cmp(&b.language)));
    Some(shares)
}

/// A repository's position on the creation timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoCreated {
    /// Repository name.
    pub repo: String,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

/// Filtered repositories ordered by creation time, ascending.
pub fn creation_timeline(view: &FilteredView) -> Vec<RepoCreated> {
    let mut timeline: Vec<RepoCreated> = view
        .repos
        .iter()
        .map(|r| RepoCreated {
            repo: r.name.clone(),
            created_at: r.created_at,
        })
        .collect();
    timeline.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.repo.cmp(&b.repo)));
    timeline
}
