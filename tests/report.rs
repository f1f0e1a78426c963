use std::path::Path;
use std::process::Command;

fn write_fixture(dir: &Path) {
    std::fs::write(
        dir.join("repositories.json"),
        r#"[
            {"org":"acme","name":"api","id":1,"stars":12,"forks":3,
             "language":"Rust",
             "createdAt":"2021-01-01T00:00:00Z","updatedAt":"2024-03-01T00:00:00Z"},
            {"org":"acme","name":"web","id":2,"stars":30,"forks":8,
             "language":"TypeScript",
             "createdAt":"2022-06-01T00:00:00Z","updatedAt":"2024-03-01T00:00:00Z"}
        ]"#,
    )
    .unwrap();
    // 2024-03-04 is a Monday, 2024-03-05 a Tuesday
    std::fs::write(
        dir.join("commits.json"),
        r#"[
            {"org":"acme","repoName":"api","hash":"c1","author":"alice",
             "message":"fix crash on load","date":"2024-03-04T10:00:00Z"},
            {"org":"acme","repoName":"api","hash":"c2","author":"bob",
             "message":"add new widget","date":"2024-03-04T11:00:00Z"},
            {"org":"acme","repoName":"web","hash":"c3","author":"alice",
             "message":"refactor core","date":"2024-03-05T09:00:00Z"}
        ]"#,
    )
    .unwrap();
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_orgpulse"))
        .args(args)
        .args(["--org", "acme", "--format", "json"])
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "orgpulse {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn summary_reports_key_metrics() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["summary"]);
    assert_eq!(json["metrics"]["repositories"], 2);
    assert_eq!(json["metrics"]["commits"], 3);
    assert_eq!(json["metrics"]["contributors"], 2);
    assert_eq!(json["metrics"]["stars"], 42);
    assert_eq!(json["highlights"]["topRepo"]["name"], "api");
    assert_eq!(json["highlights"]["topWeekday"]["name"], "Monday");
}

#[test]
fn contributor_ranking_orders_by_commits() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["contributors", "--analysis", "ranking"]);
    let ranking = json["ranking"].as_array().unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["author"], "alice");
    assert_eq!(ranking[0]["commits"], 2);
    assert_eq!(ranking[1]["author"], "bob");
}

#[test]
fn overlap_matrix_counts_shared_contributors() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["overlap"]);
    let overlap = &json["overlap"];
    let repos: Vec<&str> = overlap["repos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let api = repos.iter().position(|&r| r == "api").unwrap();
    let web = repos.iter().position(|&r| r == "web").unwrap();
    let matrix = overlap["matrix"].as_array().unwrap();
    assert_eq!(matrix[api][api], 2);
    assert_eq!(matrix[web][web], 1);
    // alice is shared
    assert_eq!(matrix[api][web], 1);
    assert_eq!(matrix[web][api], 1);
}

#[test]
fn content_breakdown_classifies_the_example_messages() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["content", "--report", "breakdown"]);
    let counts = json["breakdown"]["counts"].as_array().unwrap();
    let commits_for = |label: &str| {
        counts
            .iter()
            .find(|c| c["label"] == label)
            .map(|c| c["commits"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(commits_for("bugfix"), 1);
    assert_eq!(commits_for("feature"), 1);
    assert_eq!(commits_for("refactor"), 1);
    assert_eq!(json["breakdown"]["unclassified"], 0);
    assert_eq!(json["breakdown"]["total"], 3);
}

#[test]
fn trend_reports_insufficient_data_for_short_ranges() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["activity", "--series", "trend"]);
    assert_eq!(json["trend"]["status"], "insufficient");
    assert_eq!(json["trend"]["distinctDays"], 2);
}

#[test]
fn empty_repo_selection_reports_no_data_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["summary", "--repo", "absent"]);
    assert_eq!(json["metrics"]["commits"], 0);
    assert_eq!(json["metrics"]["repositories"], 0);
    assert!(json["highlights"].is_null());
}

#[test]
fn commit_type_filter_restricts_the_view() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["summary", "--commit-type", "bugfix"]);
    assert_eq!(json["metrics"]["commits"], 1);
    assert_eq!(json["highlights"]["topContributor"]["name"], "alice");
}

#[test]
fn missing_contributors_file_is_tolerated_end_to_end() {
    // The fixture writes no contributors.json at all.
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let json = run_json(dir.path(), &["contributors", "--analysis", "repos"]);
    let per_repo = json["perRepo"].as_array().unwrap();
    assert_eq!(per_repo.len(), 2);
}
