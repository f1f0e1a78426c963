//! Commit-content classification.
//!
//! Labels each commit with zero or more content categories by matching
//! case-insensitive patterns against the commit message. Matching is
//! independent per label, so a commit may carry several labels at once
//! ("fix test for refactor" is BugFix, Test, and Refactor simultaneously).
//! A commit matching no pattern carries an empty label set; consumers report
//! that complement as Unclassified.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use orgpulse_core::Commit;

/// Content category assigned to a commit by pattern match against its
/// message.
///
/// # Examples
///
/// ```
/// use orgpulse_analytics::classify::Label;
///
/// let label: Label = "bugfix".parse().unwrap();
/// assert_eq!(label, Label::BugFix);
/// assert_eq!(label.to_string(), "bugfix");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// New functionality.
    Feature,
    /// Defect fixes.
    BugFix,
    /// Restructuring and cleanup.
    Refactor,
    /// Documentation work.
    Docs,
    /// Test additions or changes.
    Test,
    /// Formatting-only changes.
    Style,
    /// Merge and pull-request commits.
    Merge,
}

impl Label {
    /// Every label, in canonical order.
    pub const ALL: [Label; 7] = [
        Label::Feature,
        Label::BugFix,
        Label::Refactor,
        Label::Docs,
        Label::Test,
        Label::Style,
        Label::Merge,
    ];

    /// The regular-expression body matched (case-insensitively) against
    /// commit messages.
    pub fn pattern(self) -> &'static str {
        match self {
            Label::Feature => "add|new|feature|implement|support",
            Label::BugFix => "fix|bug|issue|problem|error|crash",
            Label::Refactor => "refactor|clean|improve|enhance|optimize|update",
            Label::Docs => "doc|comment|readme|changelog",
            Label::Test => "test|spec|unittest",
            Label::Style => "style|format|whitespace|indent",
            Label::Merge => "merge|pull request|PR",
        }
    }

    /// Human-facing name used by text renderers.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Feature => "Features",
            Label::BugFix => "Bug Fixes",
            Label::Refactor => "Refactoring",
            Label::Docs => "Documentation",
            Label::Test => "Tests",
            Label::Style => "Style Changes",
            Label::Merge => "Merges",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Label::Feature => "feature",
            Label::BugFix => "bugfix",
            Label::Refactor => "refactor",
            Label::Docs => "docs",
            Label::Test => "test",
            Label::Style => "style",
            Label::Merge => "merge",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feature" | "features" => Ok(Label::Feature),
            "bugfix" | "bug-fix" | "fix" => Ok(Label::BugFix),
            "refactor" | "refactoring" => Ok(Label::Refactor),
            "docs" | "doc" => Ok(Label::Docs),
            "test" | "tests" => Ok(Label::Test),
            "style" => Ok(Label::Style),
            "merge" | "merges" => Ok(Label::Merge),
            other => Err(format!("unknown commit type: {other}")),
        }
    }
}

static PATTERNS: OnceLock<Vec<(Label, Regex)>> = OnceLock::new();

fn patterns() -> &'static [(Label, Regex)] {
    PATTERNS.get_or_init(|| {
        Label::ALL
            .iter()
            .map(|&label| {
                let re = Regex::new(&format!("(?i){}", label.pattern()))
                    .expect("label pattern compiles");
                (label, re)
            })
            .collect()
    })
}

/// Classify a commit message into its label set.
///
/// Pure and deterministic: identical input always yields the identical set,
/// and the result does not depend on pattern evaluation order.
///
/// # Examples
///
/// ```
/// use orgpulse_analytics::classify::{classify, Label};
///
/// let labels = classify("fix test for refactor");
/// assert!(labels.contains(&Label::BugFix));
/// assert!(labels.contains(&Label::Test));
/// assert!(labels.contains(&Label::Refactor));
///
/// assert!(classify("bump year in copyright notice").is_empty());
/// ```
pub fn classify(message: &str) -> BTreeSet<Label> {
    patterns()
        .iter()
        .filter(|(_, re)| re.is_match(message))
        .map(|(label, _)| *label)
        .collect()
}

/// Classifier with a per-commit result cache.
///
/// The cache is keyed by commit identity (org, repo, hash), which is
/// independent of any filter input: classification is a pure function of the
/// message, so entries stay valid across filter changes and re-queries of
/// the same view never recompute.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use orgpulse_analytics::classify::{Classifier, Label};
/// use orgpulse_core::Commit;
///
/// let commit = Commit {
///     org: "acme".into(),
///     repo_name: "tools".into(),
///     hash: "abc".into(),
///     author: "alice".into(),
///     author_email: String::new(),
///     message: Some("add new widget".into()),
///     date: DateTime::parse_from_rfc3339("2024-03-04T10:00:00Z").unwrap(),
///     day_of_week: None,
///     hour_of_day: None,
///     additions: 0,
///     deletions: 0,
/// };
/// let mut classifier = Classifier::new();
/// assert!(classifier.labels(&commit).contains(&Label::Feature));
/// ```
#[derive(Debug, Default)]
pub struct Classifier {
    cache: HashMap<(String, String, String), BTreeSet<Label>>,
}

impl Classifier {
    /// Create an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// The label set for `commit`, computed on first sight and cached.
    ///
    /// A missing message degrades the commit to the Unclassified state: the
    /// returned set is empty and no error is raised.
    pub fn labels(&mut self, commit: &Commit) -> &BTreeSet<Label> {
        let key = (
            commit.org.clone(),
            commit.repo_name.clone(),
            commit.hash.clone(),
        );
        self.cache
            .entry(key)
            .or_insert_with(|| commit.message.as_deref().map(classify).unwrap_or_default())
    }

    /// Number of commits with cached classification results.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
