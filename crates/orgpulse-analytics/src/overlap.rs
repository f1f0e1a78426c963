//! Cross-repository contributor overlap.
//!
//! For the selected repositories, computes each repository's distinct
//! contributor set and the pairwise intersection sizes, exposing how much
//! knowledge flows between projects.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;

/// Symmetric contributor-overlap matrix.
///
/// Indexed by `repos` in both dimensions. The diagonal holds each
/// repository's distinct-contributor count; cell (i, j) holds the size of
/// the intersection of repository i's and j's contributor sets, so the
/// matrix is symmetric and no off-diagonal value exceeds its row's diagonal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapMatrix {
    /// Repository names indexing both matrix dimensions.
    pub repos: Vec<String>,
    /// Row-major intersection counts.
    pub matrix: Vec<Vec<u64>>,
}

/// Contributor overlap across the view's selected repositories.
///
/// Returns `None` when fewer than two repositories are selected — the
/// matrix is only meaningful (and only computed) for two or more.
///
/// # Examples
///
/// ```
/// # use orgpulse_analytics::classify::Classifier;
/// # use orgpulse_analytics::filter::{apply, FilterSpec};
/// # use orgpulse_analytics::overlap::overlap_matrix;
/// # use orgpulse_store::RecordStore;
/// let store = RecordStore::from_records(Vec::new(), Vec::new(), None).unwrap();
/// let view = apply(&store, &FilterSpec::for_org("acme"), &mut Classifier::new());
/// assert!(overlap_matrix(&view).is_none());
/// ```
pub fn overlap_matrix(view: &FilteredView) -> Option<OverlapMatrix> {
    if view.repos.len() < 2 {
        return None;
    }

    let repos = view.repo_names();
    let contributor_sets: Vec<HashSet<&str>> = repos
        .iter()
        .map(|&repo| {
            view.commits
                .iter()
                .filter(|c| c.repo_name == repo)
                .map(|c| c.author.as_str())
                .collect()
        })
        .collect();

    let n = repos.len();
    let mut matrix = vec![vec![0u64; n]; n];
    for i in 0..n {
        matrix[i][i] = contributor_sets[i].len() as u64;
        for j in (i + 1)..n {
            let shared = contributor_sets[i].intersection(&contributor_sets[j]).count() as u64;
            matrix[i][j] = shared;
            matrix[j][i] = shared;
        }
    }

    Some(OverlapMatrix {
        repos: repos.into_iter().map(String::from).collect(),
        matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::filter::{apply, FilterSpec, FilteredView};
    use crate::testutil::{commit_in, repo_in, store_from};
    use orgpulse_store::RecordStore;

    fn acme_view(store: &RecordStore) -> FilteredView<'_> {
        apply(store, &FilterSpec::for_org("acme"), &mut Classifier::new())
    }

    #[test]
    fn shared_contributors_appear_off_diagonal() {
        let store = store_from(
            vec![repo_in("acme", "a", None), repo_in("acme", "b", None)],
            vec![
                commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None),
                commit_in("acme", "a", "c2", "bob", "2024-03-04T11:00:00Z", None),
                commit_in("acme", "b", "c3", "alice", "2024-03-05T10:00:00Z", None),
            ],
        );
        let view = acme_view(&store);
        let overlap = overlap_matrix(&view).unwrap();
        let a = overlap.repos.iter().position(|r| r == "a").unwrap();
        let b = overlap.repos.iter().position(|r| r == "b").unwrap();
        assert_eq!(overlap.matrix[a][a], 2);
        assert_eq!(overlap.matrix[b][b], 1);
        assert_eq!(overlap.matrix[a][b], 1);
    }

    #[test]
    fn matrix_is_symmetric_and_diagonal_dominates_rows() {
        let store = store_from(
            vec![
                repo_in("acme", "a", None),
                repo_in("acme", "b", None),
                repo_in("acme", "c", None),
            ],
            vec![
                commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None),
                commit_in("acme", "a", "c2", "bob", "2024-03-04T11:00:00Z", None),
                commit_in("acme", "b", "c3", "alice", "2024-03-05T10:00:00Z", None),
                commit_in("acme", "b", "c4", "carol", "2024-03-05T11:00:00Z", None),
                commit_in("acme", "c", "c5", "carol", "2024-03-06T10:00:00Z", None),
            ],
        );
        let view = acme_view(&store);
        let overlap = overlap_matrix(&view).unwrap();
        let n = overlap.repos.len();
        for i in 0..n {
            for j in 0..n {
                assert_eq!(overlap.matrix[i][j], overlap.matrix[j][i]);
                if i != j {
                    assert!(overlap.matrix[i][i] >= overlap.matrix[i][j]);
                }
            }
        }
    }

    #[test]
    fn disjoint_repositories_have_zero_overlap() {
        let store = store_from(
            vec![repo_in("acme", "a", None), repo_in("acme", "b", None)],
            vec![
                commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None),
                commit_in("acme", "b", "c2", "bob", "2024-03-05T10:00:00Z", None),
            ],
        );
        let view = acme_view(&store);
        let overlap = overlap_matrix(&view).unwrap();
        assert_eq!(overlap.matrix[0][1], 0);
    }

    #[test]
    fn single_repository_is_not_computed() {
        let store = store_from(
            vec![repo_in("acme", "a", None)],
            vec![commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None)],
        );
        let view = acme_view(&store);
        assert!(overlap_matrix(&view).is_none());
    }

    #[test]
    fn repositories_without_commits_have_empty_sets() {
        let store = store_from(
            vec![repo_in("acme", "a", None), repo_in("acme", "quiet", None)],
            vec![commit_in("acme", "a", "c1", "alice", "2024-03-04T10:00:00Z", None)],
        );
        let view = acme_view(&store);
        let overlap = overlap_matrix(&view).unwrap();
        let q = overlap.repos.iter().position(|r| r == "quiet").unwrap();
        assert_eq!(overlap.matrix[q][q], 0);
        assert_eq!(overlap.matrix.iter().map(|row| row[q]).sum::<u64>(), 0);
    }
}
