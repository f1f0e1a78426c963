//! Shared record builders for engine tests.

use chrono::DateTime;

use orgpulse_core::{Commit, Repository};
use orgpulse_store::RecordStore;

pub fn repo_in(org: &str, name: &str, language: Option<&str>) -> Repository {
    Repository {
        org: org.into(),
        name: name.into(),
        id: 1,
        stars: 0,
        forks: 0,
        open_issues: 0,
        watchers: 0,
        language: language.map(String::from),
        created_at: DateTime::parse_from_rfc3339("2021-01-01T00:00:00Z").unwrap(),
        updated_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
        description: None,
    }
}

pub fn commit_in(
    org: &str,
    repo: &str,
    hash: &str,
    author: &str,
    rfc3339: &str,
    message: Option<&str>,
) -> Commit {
    Commit {
        org: org.into(),
        repo_name: repo.into(),
        hash: hash.into(),
        author: author.into(),
        author_email: format!("{author}@example.com"),
        message: message.map(String::from),
        date: DateTime::parse_from_rfc3339(rfc3339).unwrap(),
        day_of_week: None,
        hour_of_day: None,
        additions: 0,
        deletions: 0,
    }
}

pub fn store_from(repos: Vec<Repository>, commits: Vec<Commit>) -> RecordStore {
    RecordStore::from_records(repos, commits, None).unwrap()
}
