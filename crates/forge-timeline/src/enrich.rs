// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Attaching diffs to commits and merge requests
//!
//! Both enrichers fan out one task per item onto a [`JoinSet`] and join all
//! of them before sorting. Ordering never depends on which task finished
//! first.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::commit::{CommitRecord, EnrichedCommit, sort_chronologically};
use crate::diff::FileChange;
use crate::error::{RemoteCall, TimelineError};
use crate::limiter::ConcurrencyLimiter;
use crate::merge_request::{EnrichedMergeRequest, MergeRequestRecord};
use crate::policy::{FailurePolicy, Settled, SkipTarget, settle};
use crate::project::ProjectId;
use crate::source::RemoteSource;

/// Attaches a diff to a single commit
#[derive(Clone)]
pub struct CommitEnricher {
    source: Arc<dyn RemoteSource>,
    project: ProjectId,
    limiter: ConcurrencyLimiter,
}

impl CommitEnricher {
    /// Create an enricher for commits of `project`
    #[must_use]
    pub fn new(
        source: Arc<dyn RemoteSource>,
        project: ProjectId,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            source,
            project,
            limiter,
        }
    }

    /// Fetch the diff of one commit
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Remote` if the diff cannot be fetched.
    pub async fn enrich(&self, commit: CommitRecord) -> Result<EnrichedCommit, TimelineError> {
        let call = RemoteCall::CommitDiff {
            sha: commit.sha.clone(),
        };
        let changes = self
            .limiter
            .run(call, self.source.commit_diff(self.project, &commit.sha))
            .await?;
        Ok(EnrichedCommit { commit, changes })
    }

    /// Enrich every commit in parallel and sort the results chronologically
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`], returns the first failure and
    /// aborts the remaining tasks.
    pub async fn enrich_all(
        &self,
        commits: Vec<CommitRecord>,
        policy: FailurePolicy,
    ) -> Result<Settled<EnrichedCommit>, TimelineError> {
        let mut tasks = JoinSet::new();
        for commit in commits {
            let enricher = self.clone();
            tasks.spawn(async move {
                let target = SkipTarget::Commit {
                    sha: commit.sha.clone(),
                };
                (target, enricher.enrich(commit).await)
            });
        }

        let mut settled = settle(tasks, policy).await?;
        sort_chronologically(&mut settled.items);
        Ok(settled)
    }
}

/// Builds an [`EnrichedMergeRequest`] from a bare merge request
///
/// The commit list (with each commit's diff) and the merge diff are fetched
/// concurrently. The merge request is only produced once both are complete.
#[derive(Clone)]
pub struct MergeRequestEnricher {
    commits: CommitEnricher,
}

impl MergeRequestEnricher {
    /// Create an enricher for merge requests of `project`
    #[must_use]
    pub fn new(
        source: Arc<dyn RemoteSource>,
        project: ProjectId,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            commits: CommitEnricher::new(source, project, limiter),
        }
    }

    /// Enrich one merge request as a unit
    ///
    /// # Errors
    ///
    /// Returns the first failure from the commit list, any commit diff, or
    /// the merge diff. Nothing partially enriched is returned.
    pub async fn enrich(
        &self,
        merge_request: MergeRequestRecord,
    ) -> Result<EnrichedMergeRequest, TimelineError> {
        let iid = merge_request.iid;
        let (commits, changes) =
            tokio::try_join!(self.enrich_commits(iid), self.fetch_diff(iid))?;

        debug!(
            iid,
            commits = commits.len(),
            files = changes.len(),
            "Enriched merge request"
        );

        Ok(EnrichedMergeRequest {
            merge_request,
            commits,
            changes,
        })
    }

    /// Enrich every merge request in parallel and sort the results by iid
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`], returns the first failure and
    /// aborts the remaining tasks.
    pub async fn enrich_all(
        &self,
        merge_requests: Vec<MergeRequestRecord>,
        policy: FailurePolicy,
    ) -> Result<Settled<EnrichedMergeRequest>, TimelineError> {
        let mut tasks = JoinSet::new();
        for merge_request in merge_requests {
            let enricher = self.clone();
            tasks.spawn(async move {
                let target = SkipTarget::MergeRequest {
                    iid: merge_request.iid,
                };
                (target, enricher.enrich(merge_request).await)
            });
        }

        let mut settled = settle(tasks, policy).await?;
        settled.items.sort_by_key(EnrichedMergeRequest::iid);
        Ok(settled)
    }

    async fn enrich_commits(&self, iid: u64) -> Result<Vec<EnrichedCommit>, TimelineError> {
        let enricher = &self.commits;
        let records = enricher
            .limiter
            .run(
                RemoteCall::MergeRequestCommits { iid },
                enricher
                    .source
                    .list_merge_request_commits(enricher.project, iid),
            )
            .await?;

        // A merge request is atomic: one bad commit fails all of it.
        let settled = enricher.enrich_all(records, FailurePolicy::FailFast).await?;
        Ok(settled.items)
    }

    async fn fetch_diff(&self, iid: u64) -> Result<Vec<FileChange>, TimelineError> {
        let enricher = &self.commits;
        enricher
            .limiter
            .run(
                RemoteCall::MergeRequestDiff { iid },
                enricher.source.merge_request_diff(enricher.project, iid),
            )
            .await
    }
}
