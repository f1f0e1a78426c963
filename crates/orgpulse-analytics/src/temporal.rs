//! Temporal aggregation.
//!
//! Buckets the filtered commit view by day, month, and ISO position in the
//! week/day cycle: per-repository daily and monthly series, the rolling
//! commit trend, cumulative progress, weekday and hour histograms, and the
//! weekday × hour activity matrix. An empty view yields empty or zero-valued
//! results, never an error.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;

/// Weekday names in row order (Monday first), matching
/// [`WeekdayHistogram::counts`] and [`ActivityMatrix::rows`].
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Commit count for one (calendar day, repository) pair.
///
/// The series is sparse: days without activity are omitted. Consumers that
/// need a continuous date axis zero-fill downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Calendar day, on the commit timestamps' own clock.
    pub day: NaiveDate,
    /// Repository name.
    pub repo: String,
    /// Commits on that day.
    pub commits: u64,
}

/// Commit counts per (calendar day, repository), ascending by day then repo.
///
/// Repository-scoped: orphan commits are excluded.
pub fn daily_series(view: &FilteredView) -> Vec<DailyCount> {
    let selected: HashSet<&str> = view.repos.iter().map(|r| r.name.as_str()).collect();
    let mut buckets: BTreeMap<(NaiveDate, &str), u64> = BTreeMap::new();
    for commit in &view.commits {
        if selected.contains(commit.repo_name.as_str()) {
            *buckets
                .entry((commit.day(), commit.repo_name.as_str()))
                .or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((day, repo), commits)| DailyCount {
            day,
            repo: repo.into(),
            commits,
        })
        .collect()
}

/// One day on the continuous trend axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Calendar day.
    pub day: NaiveDate,
    /// Total commits across all selected repositories on that day.
    pub commits: u64,
    /// Trailing moving average; `None` until a full window is available.
    pub rolling_avg: Option<f64>,
}

/// The rolling commit trend, or the named insufficient-data condition.
///
/// # Examples
///
/// ```
/// use orgpulse_analytics::temporal::RollingTrend;
///
/// let trend = RollingTrend::Insufficient { distinct_days: 5 };
/// assert!(trend.is_insufficient());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RollingTrend {
    /// Fewer distinct activity days than the window width.
    #[serde(rename_all = "camelCase")]
    Insufficient {
        /// Days with at least one commit in the filtered range.
        distinct_days: usize,
    },
    /// The computed trend series.
    #[serde(rename_all = "camelCase")]
    Series {
        /// One point per day from first to last observed activity.
        points: Vec<TrendPoint>,
    },
}

impl RollingTrend {
    /// Whether the view had too few distinct days for a full window.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, RollingTrend::Insufficient { .. })
    }
}

/// Trailing moving average of total daily commits.
///
/// The trend runs over the continuous day axis from first to last observed
/// activity; days without commits count zero. Reported as
/// [`RollingTrend::Insufficient`] when fewer than `window` distinct days
/// carry activity.
pub fn rolling_trend(view: &FilteredView, window: usize) -> RollingTrend {
    let window = window.max(1);
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for commit in &view.commits {
        *per_day.entry(commit.day()).or_default() += 1;
    }

    let distinct_days = per_day.len();
    if distinct_days < window {
        return RollingTrend::Insufficient { distinct_days };
    }
    let (Some((&first, _)), Some((&last, _))) =
        (per_day.first_key_value(), per_day.last_key_value())
    else {
        return RollingTrend::Insufficient { distinct_days };
    };

    let mut points = Vec::new();
    let mut counts: Vec<u64> = Vec::new();
    let mut window_sum = 0u64;
    let mut day = first;
    loop {
        let commits = per_day.get(&day).copied().unwrap_or(0);
        counts.push(commits);
        window_sum += commits;
        if counts.len() > window {
            window_sum -= counts[counts.len() - 1 - window];
        }
        let rolling_avg = if counts.len() >= window {
            Some(window_sum as f64 / window as f64)
        } else {
            None
        };
        points.push(TrendPoint {
            day,
            commits,
            rolling_avg,
        });

        if day >= last {
            break;
        }
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }

    RollingTrend::Series { points }
}

/// Commit count for one (year-month, repository) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Calendar month label, `YYYY-MM`.
    pub month: String,
    /// Repository name.
    pub repo: String,
    /// Commits in that month.
    pub commits: u64,
}

/// Commit counts per (calendar month, repository), ascending by month.
///
/// Repository-scoped: orphan commits are excluded.
pub fn monthly_series(view: &FilteredView) -> Vec<MonthlyCount> {
    let selected: HashSet<&str> = view.repos.iter().map(|r| r.name.as_str()).collect();
    let mut buckets: BTreeMap<(String, &str), u64> = BTreeMap::new();
    for commit in &view.commits {
        if selected.contains(commit.repo_name.as_str()) {
            let day = commit.day();
            let month = format!("{:04}-{:02}", day.year(), day.month());
            *buckets.entry((month, commit.repo_name.as_str())).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((month, repo), commits)| MonthlyCount {
            month,
            repo: repo.into(),
            commits,
        })
        .collect()
}

/// One step of a repository's cumulative commit series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    /// Commit timestamp.
    pub date: DateTime<FixedOffset>,
    /// Running total at that commit.
    pub commits: u64,
}

/// Cumulative commit series for one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoCumulative {
    /// Repository name.
    pub repo: String,
    /// Running totals, timestamp ascending (ties keep input order). Strictly
    /// non-decreasing; the final value equals the repository's total
    /// filtered commit count.
    pub points: Vec<CumulativePoint>,
}

/// Per-repository running commit totals, ordered by repository name.
pub fn cumulative_series(view: &FilteredView) -> Vec<RepoCumulative> {
    let selected: HashSet<&str> = view.repos.iter().map(|r| r.name.as_str()).collect();
    let mut running: HashMap<&str, u64> = HashMap::new();
    let mut series: BTreeMap<&str, Vec<CumulativePoint>> = BTreeMap::new();
    for commit in &view.commits {
        let repo = commit.repo_name.as_str();
        if !selected.contains(repo) {
            continue;
        }
        let total = running.entry(repo).or_default();
        *total += 1;
        series.entry(repo).or_default().push(CumulativePoint {
            date: commit.date,
            commits: *total,
        });
    }
    series
        .into_iter()
        .map(|(repo, points)| RepoCumulative {
            repo: repo.into(),
            points,
        })
        .collect()
}

/// Commit counts per weekday, plus the weekday/weekend split.
///
/// `counts` is indexed Monday→Sunday (see [`WEEKDAY_NAMES`]) and always
/// carries all seven buckets; the seven counts sum to the view's total
/// commit count. Percentages are zero for an empty view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHistogram {
    /// Commit count per weekday, Monday first.
    pub counts: [u64; 7],
    /// Share of commits on Monday–Friday, percent of the filtered total.
    pub weekday_pct: f64,
    /// Share of commits on Saturday/Sunday, percent of the filtered total.
    pub weekend_pct: f64,
}

/// Histogram of commits by weekday over the whole filtered view.
pub fn weekday_histogram(view: &FilteredView) -> WeekdayHistogram {
    let mut counts = [0u64; 7];
    for commit in &view.commits {
        counts[commit.weekday().num_days_from_monday() as usize] += 1;
    }
    let total: u64 = counts.iter().sum();
    let weekdays: u64 = counts[..5].iter().sum();
    let (weekday_pct, weekend_pct) = if total == 0 {
        (0.0, 0.0)
    } else {
        let pct = 100.0 * weekdays as f64 / total as f64;
        (pct, 100.0 - pct)
    };
    WeekdayHistogram {
        counts,
        weekday_pct,
        weekend_pct,
    }
}

/// Commit counts per hour of day, plus the business-hours split.
///
/// The 24 counts sum to the view's total commit count. Hours are the
/// timestamps' own clock values; no timezone conversion is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourHistogram {
    /// Commit count per hour, 0–23.
    pub counts: [u64; 24],
    /// Share of commits within business hours, percent of the filtered
    /// total.
    pub business_pct: f64,
    /// Share of commits outside business hours.
    pub off_hours_pct: f64,
}

/// Histogram of commits by hour over the whole filtered view.
///
/// `business_hours` is the inclusive `[start, end]` hour range counted as
/// business time (the default `[9, 17]` covers 09:00–17:59).
pub fn hour_histogram(view: &FilteredView, business_hours: [u32; 2]) -> HourHistogram {
    let mut counts = [0u64; 24];
    for commit in &view.commits {
        counts[commit.hour() as usize] += 1;
    }
    let total: u64 = counts.iter().sum();
    let business: u64 = (business_hours[0]..=business_hours[1])
        .filter_map(|h| counts.get(h as usize))
        .sum();
    let (business_pct, off_hours_pct) = if total == 0 {
        (0.0, 0.0)
    } else {
        let pct = 100.0 * business as f64 / total as f64;
        (pct, 100.0 - pct)
    };
    HourHistogram {
        counts,
        business_pct,
        off_hours_pct,
    }
}

/// Weekday × hour commit-count matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMatrix {
    /// Rows Monday→Sunday, columns hour 0–23, zero-filled.
    pub rows: [[u64; 24]; 7],
}

/// The 7 × 24 activity matrix over the whole filtered view.
pub fn activity_matrix(view: &FilteredView) -> ActivityMatrix {
    let mut rows = [[0u64; 24]; 7];
    for commit in &view.commits {
        rows[commit.weekday().num_days_from_monday() as usize][commit.hour() as usize] += 1;
    }
    ActivityMatrix { rows }
}
