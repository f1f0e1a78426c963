//! Record store: loads the repository, commit, and contributor collections
//! once per analysis session and normalizes them for the analytics engines.
//!
//! The collections are JSON arrays (`repositories.json`, `commits.json`, and
//! optionally `contributors.json`) matching the record types in
//! `orgpulse-core`. Loading is the only I/O in the system; everything
//! downstream is a pure computation over the loaded, read-only collections.

use std::path::Path;

use tracing::debug;

use orgpulse_core::{Capabilities, Commit, Contributor, PulseError, Repository};

/// The three record collections, loaded once and treated as read-only.
///
/// Commits are held sorted by timestamp ascending; the sort is stable, so
/// equal timestamps keep their input order.
///
/// # Examples
///
/// ```
/// use orgpulse_store::RecordStore;
///
/// let store = RecordStore::from_records(Vec::new(), Vec::new(), None).unwrap();
/// assert!(store.repos.is_empty());
/// assert!(!store.capabilities.has_contributors);
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Repository records, in input order.
    pub repos: Vec<Repository>,
    /// Commit records, sorted by timestamp ascending (stable).
    pub commits: Vec<Commit>,
    /// Contributor records, when the collection exists.
    pub contributors: Option<Vec<Contributor>>,
    /// What the loaded collections can support.
    pub capabilities: Capabilities,
}

impl RecordStore {
    /// Load the record collections from `dir`.
    ///
    /// `repositories.json` and `commits.json` are required;
    /// `contributors.json` is optional and its absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::FileNotFound`] when a required file is missing,
    /// [`PulseError::Io`] on read failure, [`PulseError::Serialization`] on
    /// malformed JSON, and [`PulseError::Data`] when the repository
    /// collection violates the (org, name) uniqueness invariant.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use orgpulse_store::RecordStore;
    ///
    /// let store = RecordStore::load(Path::new("github_data")).unwrap();
    /// println!("{} commits across {} repos", store.commits.len(), store.repos.len());
    /// ```
    pub fn load(dir: &Path) -> Result<Self, PulseError> {
        let repos: Vec<Repository> = read_collection(&dir.join("repositories.json"))?;
        let commits: Vec<Commit> = read_collection(&dir.join("commits.json"))?;

        let contributors_path = dir.join("contributors.json");
        let contributors: Option<Vec<Contributor>> = if contributors_path.exists() {
            Some(read_collection(&contributors_path)?)
        } else {
            None
        };

        Self::from_records(repos, commits, contributors)
    }

    /// Build a store from already-parsed collections.
    ///
    /// Applies the same normalization as [`RecordStore::load`]: commits are
    /// stably sorted by timestamp and capabilities are detected.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Data`] when two repository records share an
    /// (org, name) pair.
    pub fn from_records(
        repos: Vec<Repository>,
        mut commits: Vec<Commit>,
        contributors: Option<Vec<Contributor>>,
    ) -> Result<Self, PulseError> {
        let mut seen = std::collections::HashSet::new();
        for repo in &repos {
            if !seen.insert((repo.org.as_str(), repo.name.as_str())) {
                return Err(PulseError::Data(format!(
                    "duplicate repository record {}/{}",
                    repo.org, repo.name
                )));
            }
        }

        commits.sort_by_key(|c| c.date);

        let capabilities = Capabilities::detect(&repos, &commits, contributors.is_some());
        debug!(
            repos = repos.len(),
            commits = commits.len(),
            contributors = contributors.as_ref().map_or(0, Vec::len),
            "record store loaded"
        );

        Ok(Self {
            repos,
            commits,
            contributors,
            capabilities,
        })
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, PulseError> {
    if !path.exists() {
        return Err(PulseError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn repo(org: &str, name: &str) -> Repository {
        serde_json::from_str(&format!(
            r#"{{"org":"{org}","name":"{name}","id":1,
                "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2021-01-01T00:00:00Z"}}"#
        ))
        .unwrap()
    }

    fn commit(hash: &str, rfc3339: &str) -> Commit {
        Commit {
            org: "acme".into(),
            repo_name: "tools".into(),
            hash: hash.into(),
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
    fn commits_are_sorted_by_timestamp() {
        let commits = vec![
            commit("c", "2024-03-03T00:00:00Z"),
            commit("a", "2024-03-01T00:00:00Z"),
            commit("b", "2024-03-02T00:00:00Z"),
        ];
        let store = RecordStore::from_records(vec![repo("acme", "tools")], commits, None).unwrap();
        let hashes: Vec<&str> = store.commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["a", "b", "c"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let commits = vec![
            commit("first", "2024-03-01T00:00:00Z"),
            commit("second", "2024-03-01T00:00:00Z"),
        ];
        let store = RecordStore::from_records(vec![repo("acme", "tools")], commits, None).unwrap();
        assert_eq!(store.commits[0].hash, "first");
        assert_eq!(store.commits[1].hash, "second");
    }

    #[test]
    fn duplicate_repository_identity_is_rejected() {
        let repos = vec![repo("acme", "tools"), repo("acme", "tools")];
        let err = RecordStore::from_records(repos, Vec::new(), None).unwrap_err();
        assert!(err.to_string().contains("acme/tools"));
    }

    #[test]
    fn same_name_in_different_orgs_is_allowed() {
        let repos = vec![repo("acme", "tools"), repo("globex", "tools")];
        assert!(RecordStore::from_records(repos, Vec::new(), None).is_ok());
    }

    #[test]
    fn load_reads_all_three_collections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("repositories.json"),
            r#"[{"org":"acme","name":"tools","id":1,"language":"Rust",
                "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2021-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("commits.json"),
            r#"[{"org":"acme","repoName":"tools","hash":"abc","author":"alice",
                "message":"add parser","date":"2024-03-04T10:00:00Z"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("contributors.json"),
            r#"[{"org":"acme","repoName":"tools","login":"alice","id":7,"contributions":3}]"#,
        )
        .unwrap();

        let store = RecordStore::load(dir.path()).unwrap();
        assert_eq!(store.repos.len(), 1);
        assert_eq!(store.commits.len(), 1);
        assert_eq!(store.contributors.as_ref().unwrap().len(), 1);
        assert!(store.capabilities.has_language);
        assert!(store.capabilities.has_message);
        assert!(store.capabilities.has_contributors);
    }

    #[test]
    fn missing_contributors_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("repositories.json"), "[]").unwrap();
        std::fs::write(dir.path().join("commits.json"), "[]").unwrap();

        let store = RecordStore::load(dir.path()).unwrap();
        assert!(store.contributors.is_none());
        assert!(!store.capabilities.has_contributors);
    }

    #[test]
    fn missing_commits_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("repositories.json"), "[]").unwrap();

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, PulseError::FileNotFound(_)));
    }
}
