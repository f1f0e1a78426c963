use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// A repository record supplied by the record store.
///
/// Identity is the (org, name) pair. Immutable once loaded.
///
/// # Examples
///
/// ```
/// use orgpulse_core::Repository;
///
/// let json = r#"{
///     "org": "acme",
///     "name": "tools",
///     "id": 42,
///     "stars": 120,
///     "forks": 14,
///     "openIssues": 3,
///     "watchers": 110,
///     "language": "Rust",
///     "createdAt": "2021-06-01T00:00:00Z",
///     "updatedAt": "2024-03-01T12:00:00Z"
/// }"#;
/// let repo: Repository = serde_json::from_str(json).unwrap();
/// assert_eq!(repo.language_or_unknown(), "Rust");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Owning organization.
    pub org: String,
    /// Repository name, unique within the org.
    pub name: String,
    /// Numeric identifier from the data source.
    pub id: i64,
    /// Star count.
    #[serde(default)]
    pub stars: u64,
    /// Fork count.
    #[serde(default)]
    pub forks: u64,
    /// Open issue count.
    #[serde(default)]
    pub open_issues: u64,
    /// Watcher count.
    #[serde(default)]
    pub watchers: u64,
    /// Primary language, when the data source reports one.
    #[serde(default)]
    pub language: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last-update timestamp.
    pub updated_at: DateTime<FixedOffset>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Repository {
    /// The repository language, with `"Unknown"` substituted for a missing
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgpulse_core::Repository;
    ///
    /// let json = r#"{"org":"acme","name":"tools","id":1,
    ///     "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2021-01-01T00:00:00Z"}"#;
    /// let repo: Repository = serde_json::from_str(json).unwrap();
    /// assert_eq!(repo.language_or_unknown(), "Unknown");
    /// ```
    pub fn language_or_unknown(&self) -> &str {
        self.language.as_deref().unwrap_or("Unknown")
    }
}

/// A commit record supplied by the record store.
///
/// The timestamp keeps its original fixed offset; hour-of-day and day-of-week
/// are the timestamp's own clock values, never timezone-converted. The
/// pre-derived `day_of_week`/`hour_of_day` fields are optional — accessors
/// fall back to deriving from the timestamp.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Weekday};
/// use orgpulse_core::Commit;
///
/// let commit = Commit {
///     org: "acme".into(),
///     repo_name: "tools".into(),
///     hash: "abc123".into(),
///     author: "alice".into(),
///     author_email: "alice@example.com".into(),
///     message: Some("fix: auth bug".into()),
///     date: DateTime::parse_from_rfc3339("2024-03-04T09:30:00+02:00").unwrap(),
///     day_of_week: None,
///     hour_of_day: None,
///     additions: 10,
///     deletions: 2,
/// };
/// assert_eq!(commit.weekday(), Weekday::Mon);
/// assert_eq!(commit.hour(), 9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Owning organization.
    pub org: String,
    /// Name of the repository this commit belongs to.
    pub repo_name: String,
    /// Commit hash, unique within the repository.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    #[serde(default)]
    pub author_email: String,
    /// Commit message; absent messages degrade the commit to Unclassified.
    #[serde(default)]
    pub message: Option<String>,
    /// Commit timestamp with its original UTC offset.
    pub date: DateTime<FixedOffset>,
    /// Pre-derived weekday name (e.g. `"Monday"`), when the source provides it.
    #[serde(default)]
    pub day_of_week: Option<String>,
    /// Pre-derived hour of day (0–23), when the source provides it.
    #[serde(default)]
    pub hour_of_day: Option<u8>,
    /// Lines added (zero when unknown).
    #[serde(default)]
    pub additions: u64,
    /// Lines deleted (zero when unknown).
    #[serde(default)]
    pub deletions: u64,
}

impl Commit {
    /// Weekday of the commit, preferring the pre-derived field.
    ///
    /// An unparseable stored value falls back to the timestamp.
    pub fn weekday(&self) -> Weekday {
        self.day_of_week
            .as_deref()
            .and_then(|s| Weekday::from_str(s).ok())
            .unwrap_or_else(|| self.date.weekday())
    }

    /// Hour of day (0–23) of the commit, preferring the pre-derived field.
    pub fn hour(&self) -> u32 {
        self.hour_of_day
            .map(|h| u32::from(h) % 24)
            .unwrap_or_else(|| self.date.hour())
    }

    /// Calendar day of the commit, on the timestamp's own clock.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// A contributor record supplied by the record store.
///
/// Independent of [`Commit`] records; its lifetime contribution count may
/// disagree with commit-derived contributor sets since it reflects a
/// different counting window.
///
/// # Examples
///
/// ```
/// use orgpulse_core::Contributor;
///
/// let json = r#"{"org":"acme","repoName":"tools","login":"alice",
///     "id":7,"contributions":250}"#;
/// let c: Contributor = serde_json::from_str(json).unwrap();
/// assert_eq!(c.contributions, 250);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    /// Owning organization.
    pub org: String,
    /// Repository the contribution count applies to.
    pub repo_name: String,
    /// Contributor login.
    pub login: String,
    /// Numeric identifier from the data source.
    pub id: i64,
    /// Lifetime contribution count reported by the data source.
    pub contributions: u64,
}

/// What the loaded record collections can support, computed once after
/// loading. Engines consult this instead of re-deriving it from data shape.
///
/// # Examples
///
/// ```
/// use orgpulse_core::Capabilities;
///
/// let caps = Capabilities {
///     has_language: true,
///     has_message: false,
///     has_contributors: false,
/// };
/// assert!(!caps.has_message);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// At least one repository record carries a language.
    pub has_language: bool,
    /// At least one commit record carries a message.
    pub has_message: bool,
    /// The contributor collection is present.
    pub has_contributors: bool,
}

impl Capabilities {
    /// Detect capabilities from the loaded collections.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgpulse_core::Capabilities;
    ///
    /// let caps = Capabilities::detect(&[], &[], false);
    /// assert!(!caps.has_language);
    /// assert!(!caps.has_message);
    /// assert!(!caps.has_contributors);
    /// ```
    pub fn detect(repos: &[Repository], commits: &[Commit], has_contributors: bool) -> Self {
        Self {
            has_language: repos.iter().any(|r| r.language.is_some()),
            has_message: commits.iter().any(|c| c.message.is_some()),
            has_contributors,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use orgpulse_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_at(rfc3339: &str) -> Commit {
        Commit {
            org: "acme".into(),
            repo_name: "tools".into(),
            hash: "abc".into(),
            author: "alice".into(),
            author_email: "alice@example.com".into(),
            message: None,
            date: DateTime::parse_from_rfc3339(rfc3339).unwrap(),
            day_of_week: None,
            hour_of_day: None,
            additions: 0,
            deletions: 0,
        }
    }

    #[test]
    fn weekday_derived_from_timestamp_when_absent() {
        // 2024-03-04 is a Monday
        let commit = commit_at("2024-03-04T10:00:00Z");
        assert_eq!(commit.weekday(), Weekday::Mon);
    }

    #[test]
    fn stored_weekday_wins_over_timestamp() {
        let mut commit = commit_at("2024-03-04T10:00:00Z");
        commit.day_of_week = Some("Friday".into());
        assert_eq!(commit.weekday(), Weekday::Fri);
    }

    #[test]
    fn unparseable_weekday_falls_back_to_timestamp() {
        let mut commit = commit_at("2024-03-04T10:00:00Z");
        commit.day_of_week = Some("Blursday".into());
        assert_eq!(commit.weekday(), Weekday::Mon);
    }

    #[test]
    fn hour_keeps_the_timestamps_own_clock() {
        // 23:30 at +05:00 is 18:30 UTC; the raw clock value must win.
        let commit = commit_at("2024-03-04T23:30:00+05:00");
        assert_eq!(commit.hour(), 23);
    }

    #[test]
    fn stored_hour_wins_and_wraps_into_range() {
        let mut commit = commit_at("2024-03-04T10:00:00Z");
        commit.hour_of_day = Some(14);
        assert_eq!(commit.hour(), 14);
        commit.hour_of_day = Some(25);
        assert_eq!(commit.hour(), 1);
    }

    #[test]
    fn missing_optional_columns_deserialize_with_defaults() {
        let json = r#"{
            "org": "acme",
            "repoName": "tools",
            "hash": "abc123",
            "author": "alice",
            "date": "2024-03-04T10:00:00Z"
        }"#;
        let commit: Commit = serde_json::from_str(json).unwrap();
        assert!(commit.message.is_none());
        assert!(commit.day_of_week.is_none());
        assert_eq!(commit.additions, 0);
        assert_eq!(commit.author_email, "");
    }

    #[test]
    fn capabilities_reflect_record_contents() {
        let repo_json = r#"{"org":"acme","name":"tools","id":1,"language":"Rust",
            "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2021-01-01T00:00:00Z"}"#;
        let repo: Repository = serde_json::from_str(repo_json).unwrap();
        let mut commit = commit_at("2024-03-04T10:00:00Z");
        commit.message = Some("add widget".into());

        let caps = Capabilities::detect(&[repo], &[commit], true);
        assert!(caps.has_language);
        assert!(caps.has_message);
        assert!(caps.has_contributors);
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn repository_serializes_camel_case() {
        let json = r#"{"org":"acme","name":"tools","id":1,
            "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2021-01-01T00:00:00Z"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&repo).unwrap();
        assert!(value.get("openIssues").is_some());
        assert!(value.get("open_issues").is_none());
    }
}
