// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Remote source backed by a JSON snapshot of one project
//!
//! A snapshot lists every merge request and commit of a project, together
//! with their diffs. Merge requests name their commits by sha:
//!
//! ```json
//! {
//!   "project": 42,
//!   "merge_requests": [
//!     {
//!       "iid": 7,
//!       "author": { "username": "jdoe", "name": "Jane Doe" },
//!       "title": "Add pagination",
//!       "created_at": "2026-03-02T10:00:00Z",
//!       "web_url": "https://gitlab.example.com/group/app/-/merge_requests/7",
//!       "commits": ["a1b2c3d4e5f6"],
//!       "changes": []
//!     }
//!   ],
//!   "commits": [
//!     {
//!       "sha": "a1b2c3d4e5f6",
//!       "message": "Add page type",
//!       "author_name": "Jane Doe",
//!       "created_at": "2026-03-02T09:30:00Z",
//!       "changes": [
//!         { "path": "src/page.rs", "kind": "added", "patch": "+pub struct Page;\n" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Listing calls apply the half-open window to `created_at`, the way the
//! hosting API filters by creation date.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use forge_timeline::{
    CommitRecord, FileChange, MergeRequestRecord, ProjectId, RemoteError, RemoteSource, TimeWindow,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or does not match the expected shape
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two merge requests share an iid
    #[error("Duplicate merge request !{iid}")]
    DuplicateMergeRequest {
        /// The repeated iid
        iid: u64,
    },

    /// Two commits share a sha
    #[error("Duplicate commit {sha}")]
    DuplicateCommit {
        /// The repeated sha
        sha: String,
    },

    /// A merge request names a commit the snapshot does not contain
    #[error("Merge request !{iid} references unknown commit {sha}")]
    UnknownCommit {
        /// Referencing merge request
        iid: u64,
        /// Missing sha
        sha: String,
    },
}

/// On-disk snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Project the snapshot was taken from
    pub project: ProjectId,
    /// Every merge request of the project
    #[serde(default)]
    pub merge_requests: Vec<SnapshotMergeRequest>,
    /// Every commit of the project
    #[serde(default)]
    pub commits: Vec<SnapshotCommit>,
}

/// A merge request entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMergeRequest {
    /// The merge request itself
    #[serde(flatten)]
    pub record: MergeRequestRecord,
    /// Shas of the commits it contains
    #[serde(default)]
    pub commits: Vec<String>,
    /// Its aggregate diff
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// A commit entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCommit {
    /// The commit itself
    #[serde(flatten)]
    pub record: CommitRecord,
    /// Its diff
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// [`RemoteSource`] answering from an in-memory [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    project: ProjectId,
    merge_requests: Vec<MergeRequestRecord>,
    commits: Vec<CommitRecord>,
    commit_index: HashMap<String, usize>,
    merge_request_commits: HashMap<u64, Vec<String>>,
    merge_request_diffs: HashMap<u64, Vec<FileChange>>,
    commit_diffs: HashMap<String, Vec<FileChange>>,
}

impl SnapshotSource {
    /// Load a snapshot file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot,
    /// or is internally inconsistent.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        Self::from_snapshot(snapshot)
    }

    /// Parse a snapshot from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or inconsistent.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Index a parsed snapshot
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate iids or shas, or when a merge request
    /// references a commit that is not in the snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let mut commits = Vec::with_capacity(snapshot.commits.len());
        let mut commit_index = HashMap::with_capacity(snapshot.commits.len());
        let mut commit_diffs = HashMap::with_capacity(snapshot.commits.len());
        for entry in snapshot.commits {
            let sha = entry.record.sha.clone();
            if commit_index.insert(sha.clone(), commits.len()).is_some() {
                return Err(SnapshotError::DuplicateCommit { sha });
            }
            commit_diffs.insert(sha, entry.changes);
            commits.push(entry.record);
        }

        let mut merge_requests = Vec::with_capacity(snapshot.merge_requests.len());
        let mut merge_request_commits = HashMap::new();
        let mut merge_request_diffs = HashMap::new();
        let mut seen = HashSet::new();
        for entry in snapshot.merge_requests {
            let iid = entry.record.iid;
            if !seen.insert(iid) {
                return Err(SnapshotError::DuplicateMergeRequest { iid });
            }
            if let Some(sha) = entry
                .commits
                .iter()
                .find(|sha| !commit_index.contains_key(sha.as_str()))
            {
                return Err(SnapshotError::UnknownCommit {
                    iid,
                    sha: sha.clone(),
                });
            }
            merge_request_commits.insert(iid, entry.commits);
            merge_request_diffs.insert(iid, entry.changes);
            merge_requests.push(entry.record);
        }

        debug!(
            project = %snapshot.project,
            merge_requests = merge_requests.len(),
            commits = commits.len(),
            "Loaded snapshot"
        );

        Ok(Self {
            project: snapshot.project,
            merge_requests,
            commits,
            commit_index,
            merge_request_commits,
            merge_request_diffs,
            commit_diffs,
        })
    }

    /// Project this snapshot describes
    #[must_use]
    pub fn project(&self) -> ProjectId {
        self.project
    }

    fn check_project(&self, project: ProjectId) -> Result<(), RemoteError> {
        if project == self.project {
            Ok(())
        } else {
            Err(RemoteError::not_found(format!("project {project}")))
        }
    }
}

#[async_trait]
impl RemoteSource for SnapshotSource {
    async fn list_merge_requests(
        &self,
        project: ProjectId,
        window: TimeWindow,
    ) -> Result<Vec<MergeRequestRecord>, RemoteError> {
        self.check_project(project)?;
        Ok(self
            .merge_requests
            .iter()
            .filter(|mr| window.contains(mr.created_at))
            .cloned()
            .collect())
    }

    async fn list_commits(
        &self,
        project: ProjectId,
        window: TimeWindow,
    ) -> Result<Vec<CommitRecord>, RemoteError> {
        self.check_project(project)?;
        Ok(self
            .commits
            .iter()
            .filter(|commit| window.contains(commit.created_at))
            .cloned()
            .collect())
    }

    async fn list_merge_request_commits(
        &self,
        project: ProjectId,
        iid: u64,
    ) -> Result<Vec<CommitRecord>, RemoteError> {
        self.check_project(project)?;
        let shas = self
            .merge_request_commits
            .get(&iid)
            .ok_or_else(|| RemoteError::not_found(format!("merge request !{iid}")))?;
        shas.iter()
            .map(|sha| {
                self.commit_index
                    .get(sha)
                    .map(|&idx| self.commits[idx].clone())
                    .ok_or_else(|| RemoteError::not_found(format!("commit {sha}")))
            })
            .collect()
    }

    async fn merge_request_diff(
        &self,
        project: ProjectId,
        iid: u64,
    ) -> Result<Vec<FileChange>, RemoteError> {
        self.check_project(project)?;
        self.merge_request_diffs
            .get(&iid)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("merge request !{iid}")))
    }

    async fn commit_diff(
        &self,
        project: ProjectId,
        sha: &str,
    ) -> Result<Vec<FileChange>, RemoteError> {
        self.check_project(project)?;
        self.commit_diffs
            .get(sha)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("commit {sha}")))
    }
}
