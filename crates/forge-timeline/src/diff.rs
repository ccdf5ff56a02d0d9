// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! File change types shared by commits and merge requests

use serde::{Deserialize, Serialize};

/// How a file was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// File was created
    Added,
    /// File contents changed in place
    Modified,
    /// File was removed
    Deleted,
    /// File was moved, possibly with content changes
    Renamed,
}

/// One file's diff within a commit or merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path of the file after the change
    pub path: String,
    /// Path before the change, when it differs from `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    /// Kind of change
    pub kind: ChangeKind,
    /// Unified diff hunks for this file
    #[serde(default)]
    pub patch: String,
}

impl FileChange {
    /// Create a change for a file that kept its path
    #[must_use]
    pub fn new(path: impl Into<String>, kind: ChangeKind, patch: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            kind,
            patch: patch.into(),
        }
    }

    /// Create a change for a file that moved from `old_path` to `path`
    #[must_use]
    pub fn renamed(
        old_path: impl Into<String>,
        path: impl Into<String>,
        patch: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            old_path: Some(old_path.into()),
            kind: ChangeKind::Renamed,
            patch: patch.into(),
        }
    }

    /// Count added and removed lines in the patch
    ///
    /// Returns `(insertions, deletions)`. File header lines (`+++`/`---`)
    /// are not counted.
    #[must_use]
    pub fn line_stats(&self) -> (usize, usize) {
        let mut insertions = 0;
        let mut deletions = 0;
        for line in self.patch.lines() {
            if line.starts_with("+++") || line.starts_with("---") {
                continue;
            }
            if line.starts_with('+') {
                insertions += 1;
            } else if line.starts_with('-') {
                deletions += 1;
            }
        }
        (insertions, deletions)
    }
}

/// Summary of a set of file changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Number of files changed
    pub files_changed: usize,
    /// Total lines added
    pub insertions: usize,
    /// Total lines deleted
    pub deletions: usize,
}

impl DiffStats {
    /// Summarise a sequence of file changes
    #[must_use]
    pub fn from_changes(changes: &[FileChange]) -> Self {
        changes.iter().fold(Self::default(), |mut stats, change| {
            let (insertions, deletions) = change.line_stats();
            stats.files_changed += 1;
            stats.insertions += insertions;
            stats.deletions += deletions;
            stats
        })
    }
}
