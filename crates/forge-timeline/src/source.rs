// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The remote data source contract
//!
//! A [`RemoteSource`] is supplied by the caller, already authorized against
//! the remote server. The aggregation only reads from it and never retries;
//! retry and backoff are the source's concern.

use async_trait::async_trait;

use crate::commit::CommitRecord;
use crate::diff::FileChange;
use crate::error::RemoteError;
use crate::merge_request::MergeRequestRecord;
use crate::project::{ProjectId, TimeWindow};

/// Read access to a project's activity on a code-hosting server
///
/// Every method may suspend and may fail with any [`RemoteError`] variant.
/// Implementations must be shareable across tasks.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Merge requests created within the window
    async fn list_merge_requests(
        &self,
        project: ProjectId,
        window: TimeWindow,
    ) -> Result<Vec<MergeRequestRecord>, RemoteError>;

    /// Commits created within the window
    async fn list_commits(
        &self,
        project: ProjectId,
        window: TimeWindow,
    ) -> Result<Vec<CommitRecord>, RemoteError>;

    /// Commits belonging to one merge request
    async fn list_merge_request_commits(
        &self,
        project: ProjectId,
        iid: u64,
    ) -> Result<Vec<CommitRecord>, RemoteError>;

    /// File changes of one merge request
    async fn merge_request_diff(
        &self,
        project: ProjectId,
        iid: u64,
    ) -> Result<Vec<FileChange>, RemoteError>;

    /// File changes of one commit
    async fn commit_diff(
        &self,
        project: ProjectId,
        sha: &str,
    ) -> Result<Vec<FileChange>, RemoteError>;
}
