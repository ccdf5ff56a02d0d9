// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Classification of commits that belong to no merge request
//!
//! The membership set is built from every enriched merge request before a
//! single commit is classified. A commit can belong to any merge request
//! in the window, so classifying against a partial set would report
//! commits as orphans too early.

use std::collections::HashSet;

use tracing::debug;

use crate::commit::{CommitRecord, EnrichedCommit};
use crate::enrich::CommitEnricher;
use crate::error::TimelineError;
use crate::merge_request::EnrichedMergeRequest;
use crate::policy::{FailurePolicy, Settled};

/// Collect the SHAs of every commit covered by a merge request
#[must_use]
pub fn covered_shas(merge_requests: &[EnrichedMergeRequest]) -> HashSet<&str> {
    merge_requests
        .iter()
        .flat_map(EnrichedMergeRequest::commit_shas)
        .collect()
}

/// Keep only commits absent from `covered`
///
/// Input order is preserved. A sha repeated in `commits` is kept once.
#[must_use]
pub fn select_orphans(commits: Vec<CommitRecord>, covered: &HashSet<&str>) -> Vec<CommitRecord> {
    let mut seen = HashSet::new();
    commits
        .into_iter()
        .filter(|commit| !covered.contains(commit.sha.as_str()))
        .filter(|commit| seen.insert(commit.sha.clone()))
        .collect()
}

/// Finds and enriches orphan commits
pub struct OrphanFilter {
    enricher: CommitEnricher,
    policy: FailurePolicy,
}

impl OrphanFilter {
    /// Create a filter that enriches orphans with `enricher`
    #[must_use]
    pub fn new(enricher: CommitEnricher, policy: FailurePolicy) -> Self {
        Self { enricher, policy }
    }

    /// Enrich the commits of `commits` that no merge request covers
    ///
    /// The result is sorted by creation time, ties broken by sha.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`], returns the first diff failure.
    pub async fn run(
        &self,
        merge_requests: &[EnrichedMergeRequest],
        commits: Vec<CommitRecord>,
    ) -> Result<Settled<EnrichedCommit>, TimelineError> {
        let total = commits.len();
        let orphans = {
            let covered = covered_shas(merge_requests);
            select_orphans(commits, &covered)
        };

        debug!(total, orphans = orphans.len(), "Classified orphan commits");

        self.enricher.enrich_all(orphans, self.policy).await
    }
}
