// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Merge request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commit::EnrichedCommit;
use crate::diff::{DiffStats, FileChange};

/// Author of a merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Account username on the remote server
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A merge request as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestRecord {
    /// Project-scoped sequence number
    pub iid: u64,
    /// Who opened the merge request
    pub author: Author,
    /// Title
    pub title: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Link to the merge request in the web UI
    pub web_url: String,
}

/// A merge request with its commits and its own diff attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMergeRequest {
    /// The merge request data
    #[serde(flatten)]
    pub merge_request: MergeRequestRecord,
    /// Commits of this merge request, oldest first
    pub commits: Vec<EnrichedCommit>,
    /// The merge diff, in the order the remote source returned it
    pub changes: Vec<FileChange>,
}

impl EnrichedMergeRequest {
    /// Merge request iid
    #[must_use]
    pub fn iid(&self) -> u64 {
        self.merge_request.iid
    }

    /// SHAs of the commits belonging to this merge request
    pub fn commit_shas(&self) -> impl Iterator<Item = &str> {
        self.commits.iter().map(EnrichedCommit::sha)
    }

    /// Summary of the merge diff
    #[must_use]
    pub fn diff_stats(&self) -> DiffStats {
        DiffStats::from_changes(&self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::CommitRecord;
    use crate::diff::ChangeKind;
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    fn sample() -> EnrichedMergeRequest {
        let created_at = Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap();
        EnrichedMergeRequest {
            merge_request: MergeRequestRecord {
                iid: 12,
                author: Author {
                    username: "jdoe".to_string(),
                    name: "Jane Doe".to_string(),
                },
                title: "Add pagination".to_string(),
                created_at,
                web_url: "https://gitlab.example.com/g/p/-/merge_requests/12".to_string(),
            },
            commits: vec![EnrichedCommit {
                commit: CommitRecord {
                    sha: "a1".to_string(),
                    message: "paginate".to_string(),
                    author_name: "Jane Doe".to_string(),
                    author_email: "jane@example.com".to_string(),
                    created_at,
                },
                changes: vec![],
            }],
            changes: vec![FileChange::new(
                "src/page.rs",
                ChangeKind::Added,
                "+pub struct Page;\n",
            )],
        }
    }

    #[test]
    fn test_commit_shas() {
        let mr = sample();
        let shas: Vec<&str> = mr.commit_shas().collect();
        assert_eq!(shas, vec!["a1"]);
    }

    #[test]
    fn test_diff_stats() {
        let stats = sample().diff_stats();
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.insertions, 1);
    }

    #[test]
    fn test_serialization_flattens_record() {
        let mr = sample();
        let json = serde_json::to_value(&mr).expect("serialize");
        assert_eq!(json["iid"], 12);
        assert_eq!(json["author"]["username"], "jdoe");
        assert_eq!(json["commits"][0]["sha"], "a1");

        let back: EnrichedMergeRequest = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, mr);
    }
}
