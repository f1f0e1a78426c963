//! Contributor analytics.
//!
//! Rankings, concentration (Pareto) statistics, per-repository contributor
//! counts, and weekly activity series for the most active contributors.
//! Contributors are identified by commit author name, matching how the
//! upstream data source attributes commits.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;

/// Pareto-statistic threshold: the top-20% share is only reported when the
/// view has more contributors than this.
const PARETO_MIN_CONTRIBUTORS: usize = 5;

/// One contributor's position in the commit-count ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRank {
    /// Author name.
    pub author: String,
    /// Commits in the filtered view.
    pub commits: u64,
}

/// Contributors ordered by descending commit count, ties broken by
/// first-seen order.
///
/// # Examples
///
/// ```
/// # use orgpulse_analytics::classify::Classifier;
/// # use orgpulse_analytics::contributors::rank_contributors;
/// # use orgpulse_analytics::filter::{apply, FilterSpec};
/// # use orgpulse_store::RecordStore;
/// let store = RecordStore::from_records(Vec::new(), Vec::new(), None).unwrap();
/// let view = apply(&store, &FilterSpec::for_org("acme"), &mut Classifier::new());
/// assert!(rank_contributors(&view).is_empty());
/// ```
pub fn rank_contributors(view: &FilteredView) -> Vec<ContributorRank> {
    let mut tally: HashMap<&str, (u64, usize)> = HashMap::new();
    for (seen, commit) in view.commits.iter().enumerate() {
        let entry = tally.entry(commit.author.as_str()).or_insert((0, seen));
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, u64, usize)> =
        tally.into_iter().map(|(a, (n, s))| (a, n, s)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(author, commits, _)| ContributorRank {
            author: author.into(),
            commits,
        })
        .collect()
}

/// The top `n` contributors by commit count.
pub fn top_contributors(view: &FilteredView, n: usize) -> Vec<ContributorRank> {
    let mut ranked = rank_contributors(view);
    ranked.truncate(n);
    ranked
}

/// One point of the concentration curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoPoint {
    /// Author at this rank.
    pub author: String,
    /// 1-indexed rank by commit count.
    pub rank: usize,
    /// 100 × rank / total contributors.
    pub percentile: f64,
    /// 100 × (commits of top-rank contributors) / total commits.
    pub cumulative_pct: f64,
}

/// The contribution concentration curve.
///
/// `cumulative_pct` is monotonically non-decreasing and reaches 100 at
/// percentile 100. The reference diagonal (y = x, perfectly equal
/// contribution) needs no data and is left to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoCurve {
    /// One point per contributor, rank ascending.
    pub points: Vec<ParetoPoint>,
    /// Cumulative commit share closest to the 20th contributor percentile
    /// (nearest rank); only reported with more than five contributors.
    pub top20_share: Option<f64>,
}

/// Concentration (Pareto) analysis of the filtered view.
///
/// Zero contributors yield an empty curve; a single contributor yields the
/// degenerate curve (100% at percentile 100).
pub fn pareto_curve(view: &FilteredView) -> ParetoCurve {
    let ranked = rank_contributors(view);
    let total_commits: u64 = ranked.iter().map(|r| r.commits).sum();
    if ranked.is_empty() || total_commits == 0 {
        return ParetoCurve {
            points: Vec::new(),
            top20_share: None,
        };
    }

    let contributor_count = ranked.len();
    let mut points = Vec::with_capacity(contributor_count);
    let mut cumulative = 0u64;
    for (idx, entry) in ranked.into_iter().enumerate() {
        cumulative += entry.commits;
        let rank = idx + 1;
        points.push(ParetoPoint {
            author: entry.author,
            rank,
            percentile: 100.0 * rank as f64 / contributor_count as f64,
            cumulative_pct: 100.0 * cumulative as f64 / total_commits as f64,
        });
    }

    // Nearest rank to the 20th percentile; earlier rank wins a distance tie.
    let top20_share = if contributor_count > PARETO_MIN_CONTRIBUTORS {
        let mut best: Option<&ParetoPoint> = None;
        for point in &points {
            let closer = best.map_or(true, |b| {
                (point.percentile - 20.0).abs() < (b.percentile - 20.0).abs()
            });
            if closer {
                best = Some(point);
            }
        }
        best.map(|p| p.cumulative_pct)
    } else {
        None
    };

    ParetoCurve {
        points,
        top20_share,
    }
}

/// Distinct-author count for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoContributors {
    /// Repository name.
    pub repo: String,
    /// Distinct commit authors in the filtered view.
    pub contributors: u64,
}

/// Distinct authors per filtered repository, descending by count then name.
///
/// Every filtered repository is reported, zero-filled when it has no commits
/// in the view.
pub fn contributors_per_repo(view: &FilteredView) -> Vec<RepoContributors> {
    let mut authors: HashMap<&str, HashSet<&str>> = view
        .repos
        .iter()
        .map(|r| (r.name.as_str(), HashSet::new()))
        .collect();
    for commit in &view.commits {
        if let Some(set) = authors.get_mut(commit.repo_name.as_str()) {
            set.insert(commit.author.as_str());
        }
    }
    let mut counts: Vec<RepoContributors> = authors
        .into_iter()
        .map(|(repo, set)| RepoContributors {
            repo: repo.into(),
            contributors: set.len() as u64,
        })
        .collect();
    counts.sort_by(|a, b| b.contributors.cmp(&a.contributors).then(a.repo.cmp(&b.repo)));
    counts
}

/// Commit count for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCount {
    /// ISO week label, `YYYY-Www`.
    pub week: String,
    /// Commits in that week.
    pub commits: u64,
}

/// Weekly activity series for one contributor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyActivity {
    /// Author name.
    pub author: String,
    /// Per-week commit counts, ascending by week.
    pub weeks: Vec<WeekCount>,
}

/// Weekly commit series for the top `k` contributors by total commit count.
///
/// Series appear in ranking order; weeks use ISO week bucketing.
pub fn top_weekly_activity(view: &FilteredView, k: usize) -> Vec<WeeklyActivity> {
    top_contributors(view, k)
        .into_iter()
        .map(|entry| {
            let mut weeks: BTreeMap<String, u64> = BTreeMap::new();
            for commit in &view.commits {
                if commit.author == entry.author {
                    let iso = commit.day().iso_week();
                    let label = format!("{:04}-W{:02}", iso.year(), iso.week());
                    *weeks.entry(label).or_default() += 1;
                }
            }
            WeeklyActivity {
                author: entry.author,
                weeks: weeks
                    .into_iter()
                    .map(|(week, commits)| WeekCount { week, commits })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::filter::{apply, FilterSpec, FilteredView};
    use crate::testutil::{commit_in, repo_in, store_from};
    use orgpulse_core::Commit;
    use orgpulse_store::RecordStore;

    fn acme_view(store: &RecordStore) -> FilteredView<'_> {
        apply(store, &FilterSpec::for_org("acme"), &mut Classifier::new())
    }

    fn commits_by(authors: &[(&str, usize)]) -> Vec<Commit> {
        let mut commits = Vec::new();
        let mut minute = 0;
        for (author, count) in authors {
            for n in 0..*count {
                commits.push(commit_in(
                    "acme",
                    "a",
                    &format!("{author}-{n}"),
                    author,
                    &format!("2024-03-04T10:{:02}:00Z", minute % 60),
                    None,
                ));
                minute += 1;
            }
        }
        commits
    }

    #[test]
    fn ranking_is_descending_by_commit_count() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            commits_by(&[("alice", 3), ("bob", 1), ("carol", 2)]),
        );
        let view = acme_view(&store);
        let ranked = rank_contributors(&view);
        let names: Vec<&str> = ranked.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(names, ["alice", "carol", "bob"]);
        assert_eq!(ranked[0].commits, 3);
    }

    #[test]
    fn ranking_ties_break_by_first_seen_order() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            commits_by(&[("zoe", 2), ("amy", 2)]),
        );
        let view = acme_view(&store);
        let ranked = rank_contributors(&view);
        assert_eq!(ranked[0].author, "zoe");
        assert_eq!(ranked[1].author, "amy");
    }

    #[test]
    fn top_contributors_is_bounded() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            commits_by(&[("alice", 3), ("bob", 2), ("carol", 1)]),
        );
        let view = acme_view(&store);
        assert_eq!(top_contributors(&view, 2).len(), 2);
    }

    #[test]
    fn pareto_curve_ends_at_one_hundred_and_is_monotone() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            commits_by(&[("alice", 5), ("bob", 3), ("carol", 2)]),
        );
        let view = acme_view(&store);
        let curve = pareto_curve(&view);
        assert_eq!(curve.points.len(), 3);
        let last = curve.points.last().unwrap();
        assert!((last.percentile - 100.0).abs() < 1e-9);
        assert!((last.cumulative_pct - 100.0).abs() < 1e-9);
        for pair in curve.points.windows(2) {
            assert!(pair[1].cumulative_pct >= pair[0].cumulative_pct);
        }
        // alice: 5 of 10 commits
        assert!((curve.points[0].cumulative_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn single_contributor_gives_degenerate_curve() {
        let store = store_from(vec![repo_in("acme", "a", None)], commits_by(&[("alice", 4)]));
        let view = acme_view(&store);
        let curve = pareto_curve(&view);
        assert_eq!(curve.points.len(), 1);
        assert!((curve.points[0].percentile - 100.0).abs() < 1e-9);
        assert!((curve.points[0].cumulative_pct - 100.0).abs() < 1e-9);
        assert!(curve.top20_share.is_none());
    }

    #[test]
    fn top20_share_uses_nearest_rank() {
        // Ten contributors: rank 2 sits exactly on the 20th percentile.
        let authors: Vec<(String, usize)> = (0..10)
            .map(|i| (format!("dev{i}"), 10 - i))
            .collect();
        let authors_ref: Vec<(&str, usize)> =
            authors.iter().map(|(a, n)| (a.as_str(), *n)).collect();
        let store = store_from(vec![repo_in("acme", "a", None)], commits_by(&authors_ref));
        let view = acme_view(&store);
        let curve = pareto_curve(&view);
        // top 2 of 55 commits: 10 + 9 = 19
        let expected = 100.0 * 19.0 / 55.0;
        assert!((curve.top20_share.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn top20_share_absent_for_five_or_fewer() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            commits_by(&[("a", 1), ("b", 1), ("c", 1), ("d", 1), ("e", 1)]),
        );
        let view = acme_view(&store);
        assert!(pareto_curve(&view).top20_share.is_none());
    }

    #[test]
    fn contributors_per_repo_counts_distinct_authors() {
        let store = store_from(
            vec![
                repo_in("acme", "a", None),
                repo_in("acme", "b", None),
                repo_in("acme", "quiet", None),
            ],
            vec![
                commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None),
                commit_in("acme", "a", "c2", "alice", "2024-03-04T11:00:00Z", None),
                commit_in("acme", "a", "c3", "bob", "2024-03-04T12:00:00Z", None),
                commit_in("acme", "b", "c4", "alice", "2024-03-05T10:00:00Z", None),
            ],
        );
        let view = acme_view(&store);
        let counts = contributors_per_repo(&view);
        assert_eq!(
            counts,
            vec![
                RepoContributors { repo: "a".into(), contributors: 2 },
                RepoContributors { repo: "b".into(), contributors: 1 },
                RepoContributors { repo: "quiet".into(), contributors: 0 },
            ]
        );
    }

    #[test]
    fn weekly_activity_buckets_by_iso_week() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            vec![
                // 2024-03-04 is in ISO week 2024-W10, 2024-03-11 in W11
                commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None),
                commit_in("acme", "a", "c2", "alice", "2024-03-05T10:00:00Z", None),
                commit_in("acme", "a", "c3", "alice", "2024-03-11T10:00:00Z", None),
                commit_in("acme", "a", "c4", "bob", "2024-03-04T10:00:00Z", None),
            ],
        );
        let view = acme_view(&store);
        let series = top_weekly_activity(&view, 5);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].author, "alice");
        assert_eq!(
            series[0].weeks,
            vec![
                WeekCount { week: "2024-W10".into(), commits: 2 },
                WeekCount { week: "2024-W11".into(), commits: 1 },
            ]
        );
        assert_eq!(series[1].author, "bob");
        assert_eq!(series[1].weeks.len(), 1);
    }

    #[test]
    fn empty_view_yields_empty_outputs() {
        let store = store_from(Vec::new(), Vec::new());
        let view = acme_view(&store);
        assert!(rank_contributors(&view).is_empty());
        assert!(pareto_curve(&view).points.is_empty());
        assert!(contributors_per_repo(&view).is_empty());
        assert!(top_weekly_activity(&view, 5).is_empty());
    }
}
