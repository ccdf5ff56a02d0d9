// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit types

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{DiffStats, FileChange};

/// A commit as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit SHA, used as the deduplication key
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    #[serde(default)]
    pub author_email: String,
    /// Commit creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CommitRecord {
    /// Get the short SHA (first 8 characters, as GitLab displays it)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    /// Get the first line of the commit message
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// A commit together with its diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCommit {
    /// The commit data
    #[serde(flatten)]
    pub commit: CommitRecord,
    /// File changes in the order the remote source returned them
    pub changes: Vec<FileChange>,
}

impl EnrichedCommit {
    /// Commit SHA
    #[must_use]
    pub fn sha(&self) -> &str {
        &self.commit.sha
    }

    /// Commit creation timestamp
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.commit.created_at
    }

    /// Summary of the attached diff
    #[must_use]
    pub fn diff_stats(&self) -> DiffStats {
        DiffStats::from_changes(&self.changes)
    }
}

/// Timeline order for commits: creation time, then sha
#[must_use]
pub fn chronological(a: &EnrichedCommit, b: &EnrichedCommit) -> Ordering {
    a.commit
        .created_at
        .cmp(&b.commit.created_at)
        .then_with(|| a.commit.sha.cmp(&b.commit.sha))
}

/// Sort commits into timeline order
pub fn sort_chronologically(commits: &mut [EnrichedCommit]) {
    commits.sort_by(chronological);
}
