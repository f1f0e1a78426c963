//! Query/filter pipeline.
//!
//! Applies the organization selector, date range, repository inclusion set,
//! language filter, and commit-type filter — in that order, composed by
//! conjunction — to produce the [`FilteredView`] every analytics engine
//! consumes. Filter inputs travel as an explicit immutable [`FilterSpec`];
//! no engine reads ambient state. Applying the same spec twice yields the
//! same view.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use orgpulse_core::{Capabilities, Commit, Contributor, Repository};
use orgpulse_store::RecordStore;

use crate::classify::{Classifier, Label};

/// Immutable filter inputs for one analysis pass.
///
/// `None` means "all" for every optional selector, making that stage a
/// no-op.
///
/// # Examples
///
/// ```
/// use orgpulse_analytics::filter::FilterSpec;
///
/// let spec = FilterSpec::for_org("acme");
/// assert!(spec.since.is_none());
/// assert!(spec.repos.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Organization to analyze (exactly one).
    pub org: String,
    /// Inclusive lower bound on the commit's calendar day.
    pub since: Option<NaiveDate>,
    /// Inclusive upper bound on the commit's calendar day.
    pub until: Option<NaiveDate>,
    /// Repository-name inclusion set.
    pub repos: Option<BTreeSet<String>>,
    /// Single-language filter, matched case-sensitively against the
    /// repository language ("Unknown" for missing values).
    pub language: Option<String>,
    /// Restrict commits to those carrying this classification label.
    pub commit_type: Option<Label>,
}

impl FilterSpec {
    /// A spec selecting everything within `org`.
    pub fn for_org(org: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            since: None,
            until: None,
            repos: None,
            language: None,
            commit_type: None,
        }
    }
}

/// The record subset remaining after applying a [`FilterSpec`].
///
/// `commits` preserves the store's timestamp-ascending order and includes
/// org-wide orphans (commits whose repository has no record); per-repository
/// metrics group only by the repositories in `repos`.
#[derive(Debug)]
pub struct FilteredView<'a> {
    /// The spec this view was built from.
    pub spec: FilterSpec,
    /// Filtered repository records.
    pub repos: Vec<&'a Repository>,
    /// Filtered commit records, timestamp ascending (stable).
    pub commits: Vec<&'a Commit>,
    /// Filtered contributor records, when the collection exists.
    pub contributors: Option<Vec<&'a Contributor>>,
    /// Commits in this view referencing a repository absent from the
    /// organization's repository collection.
    pub orphaned: usize,
    /// Capabilities of the underlying store.
    pub capabilities: Capabilities,
}

impl<'a> FilteredView<'a> {
    /// Whether the view holds no commits.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Total commit count, including orphans.
    pub fn total_commits(&self) -> usize {
        self.commits.len()
    }

    /// Names of the filtered repositories, in record order.
    pub fn repo_names(&self) -> Vec<&'a str> {
        self.repos.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Apply `spec` to the store, producing the view the engines consume.
///
/// Stages compose by conjunction, each a no-op when its selector denotes
/// "all". The result is deterministic and the operation is idempotent: the
/// same spec against the same store always builds the same view. An empty
/// result is a valid state, never an error.
///
/// # Examples
///
/// ```
/// use orgpulse_analytics::classify::Classifier;
/// use orgpulse_analytics::filter::{apply, FilterSpec};
/// use orgpulse_store::RecordStore;
///
/// let store = RecordStore::from_records(Vec::new(), Vec::new(), None).unwrap();
/// let mut classifier = Classifier::new();
/// let view = apply(&store, &FilterSpec::for_org("acme"), &mut classifier);
/// assert!(view.is_empty());
/// ```
pub fn apply<'a>(
    store: &'a RecordStore,
    spec: &FilterSpec,
    classifier: &mut Classifier,
) -> FilteredView<'a> {
    let capabilities = store.capabilities;

    let org_repo_names: HashSet<&str> = store
        .repos
        .iter()
        .filter(|r| r.org == spec.org)
        .map(|r| r.name.as_str())
        .collect();

    let mut repos: Vec<&Repository> =
        store.repos.iter().filter(|r| r.org == spec.org).collect();
    if let Some(include) = &spec.repos {
        repos.retain(|r| include.contains(&r.name));
    }
    let language_active = spec.language.is_some() && capabilities.has_language;
    if language_active {
        if let Some(language) = &spec.language {
            repos.retain(|r| r.language_or_unknown() == language);
        }
    }
    let selected_names: HashSet<&str> = repos.iter().map(|r| r.name.as_str()).collect();

    let mut commits: Vec<&Commit> = store
        .commits
        .iter()
        .filter(|c| c.org == spec.org)
        .filter(|c| spec.since.map_or(true, |d| c.day() >= d))
        .filter(|c| spec.until.map_or(true, |d| c.day() <= d))
        .collect();
    if let Some(include) = &spec.repos {
        commits.retain(|c| include.contains(&c.repo_name));
    }
    if language_active {
        commits.retain(|c| selected_names.contains(c.repo_name.as_str()));
    }
    if let Some(label) = spec.commit_type {
        commits.retain(|c| classifier.labels(c).contains(&label));
    }

    let orphaned = commits
        .iter()
        .filter(|c| !org_repo_names.contains(c.repo_name.as_str()))
        .count();
    if orphaned > 0 {
        warn!(
            org = %spec.org,
            orphaned,
            "commits reference repositories missing from the repository collection"
        );
    }

    let contributors = store.contributors.as_ref().map(|list| {
        list.iter()
            .filter(|c| c.org == spec.org && selected_names.contains(c.repo_name.as_str()))
            .collect()
    });

    FilteredView {
        spec: spec.clone(),
        repos,
        commits,
        contributors,
        orphaned,
        capabilities,
    }
}
