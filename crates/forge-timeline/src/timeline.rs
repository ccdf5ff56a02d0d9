// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The assembled timeline and its persistence view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commit::{EnrichedCommit, chronological};
use crate::merge_request::EnrichedMergeRequest;
use crate::policy::SkippedItem;
use crate::project::{ProjectId, TimeWindow};

/// A project's merge requests and orphan commits over a time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Project the timeline belongs to
    pub project: ProjectId,
    /// Window the activity was collected from
    pub window: TimeWindow,
    /// Merge requests, ordered by iid
    pub merge_requests: Vec<EnrichedMergeRequest>,
    /// Commits outside every merge request, oldest first
    pub orphan_commits: Vec<EnrichedCommit>,
    /// Items dropped because their enrichment failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItem>,
}

/// Fields needed to upsert a merge request row keyed by `(project, iid)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestRow {
    /// Owning project
    pub project: ProjectId,
    /// Merge request iid
    pub iid: u64,
    /// Username of the author
    pub author_username: String,
    /// Title
    pub title: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Web link
    pub web_url: String,
}

impl Timeline {
    /// Rows for persisting this timeline's merge requests
    ///
    /// Orphan commits are informational only and produce no rows.
    #[must_use]
    pub fn merge_request_rows(&self) -> Vec<MergeRequestRow> {
        self.merge_requests
            .iter()
            .map(|mr| {
                let record = &mr.merge_request;
                MergeRequestRow {
                    project: self.project,
                    iid: record.iid,
                    author_username: record.author.username.clone(),
                    title: record.title.clone(),
                    created_at: record.created_at,
                    web_url: record.web_url.clone(),
                }
            })
            .collect()
    }

    /// Total number of commits, inside merge requests or not
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.merge_requests
            .iter()
            .map(|mr| mr.commits.len())
            .sum::<usize>()
            + self.orphan_commits.len()
    }

    /// Check whether the window had no activity at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merge_requests.is_empty() && self.orphan_commits.is_empty()
    }

    /// Check whether every item in the window made it into the timeline
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Puts sorted merge requests and orphans together into a [`Timeline`]
pub struct TimelineAssembler;

impl TimelineAssembler {
    /// Assemble a timeline from already-sorted parts
    ///
    /// Merge requests must be ordered by iid and orphans chronologically;
    /// both orderings are established by the enrichers after their join.
    #[must_use]
    pub fn assemble(
        project: ProjectId,
        window: TimeWindow,
        merge_requests: Vec<EnrichedMergeRequest>,
        orphan_commits: Vec<EnrichedCommit>,
        mut skipped: Vec<SkippedItem>,
    ) -> Timeline {
        debug_assert!(merge_requests.is_sorted_by_key(EnrichedMergeRequest::iid));
        debug_assert!(orphan_commits.is_sorted_by(|a, b| chronological(a, b).is_le()));

        skipped.sort();

        Timeline {
            project,
            window,
            merge_requests,
            orphan_commits,
            skipped,
        }
    }
}
