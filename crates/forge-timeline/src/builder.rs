// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Timeline aggregation entry point
//!
//! # Example
//!
//! ```no_run
//! # async fn demo(source: std::sync::Arc<dyn forge_timeline::RemoteSource>) {
//! use chrono::{TimeZone, Utc};
//! use forge_timeline::{ProjectId, TimeWindow, TimelineBuilder, TimelineOptions};
//!
//! let window = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
//! )
//! .expect("valid window");
//!
//! let builder = TimelineBuilder::new(TimelineOptions::default().with_concurrency(4));
//! let timeline = builder
//!     .build(source, ProjectId(42), window)
//!     .await
//!     .expect("build timeline");
//! println!("{} merge requests", timeline.merge_requests.len());
//! # }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::enrich::{CommitEnricher, MergeRequestEnricher};
use crate::error::{RemoteCall, TimelineError};
use crate::limiter::{ConcurrencyLimiter, DEFAULT_CONCURRENCY};
use crate::orphan::OrphanFilter;
use crate::policy::FailurePolicy;
use crate::project::{ProjectId, TimeWindow};
use crate::source::RemoteSource;
use crate::timeline::{Timeline, TimelineAssembler};

/// Options for building timelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Maximum remote calls in flight at once
    pub concurrency: usize,
    /// How enrichment failures are handled
    pub policy: FailurePolicy,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            policy: FailurePolicy::FailFast,
        }
    }
}

impl TimelineOptions {
    /// Set the concurrency limit
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the failure policy
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Builds timelines against caller-supplied remote sources
///
/// A builder holds no per-request state, so one instance can serve many
/// concurrent callers. All of them share its concurrency limiter.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    policy: FailurePolicy,
    limiter: ConcurrencyLimiter,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new(TimelineOptions::default())
    }
}

impl TimelineBuilder {
    /// Create a builder with its own limiter sized from `options`
    #[must_use]
    pub fn new(options: TimelineOptions) -> Self {
        Self {
            policy: options.policy,
            limiter: ConcurrencyLimiter::new(options.concurrency),
        }
    }

    /// Use an existing limiter, sharing its permits with other users
    #[must_use]
    pub fn with_limiter(mut self, limiter: ConcurrencyLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// The limiter gating this builder's remote calls
    #[must_use]
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Build the timeline for `project` over `window`
    ///
    /// Dropping the returned future aborts every in-flight remote call.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Remote` when a listing call fails, or when any
    /// enrichment fails under [`FailurePolicy::FailFast`].
    pub async fn build(
        &self,
        source: Arc<dyn RemoteSource>,
        project: ProjectId,
        window: TimeWindow,
    ) -> Result<Timeline, TimelineError> {
        info!(project = %project, window = %window, policy = ?self.policy, "Building timeline");

        let limiter = &self.limiter;
        let merge_request_enricher =
            MergeRequestEnricher::new(Arc::clone(&source), project, limiter.clone());

        let merge_requests = async {
            let records = limiter
                .run(
                    RemoteCall::ListMergeRequests,
                    source.list_merge_requests(project, window),
                )
                .await?;
            debug!(count = records.len(), "Fetched merge requests");
            merge_request_enricher.enrich_all(records, self.policy).await
        };
        let commits = limiter.run(
            RemoteCall::ListCommits,
            source.list_commits(project, window),
        );

        let (merge_requests, commits) = tokio::try_join!(merge_requests, commits)?;
        debug!(
            merge_requests = merge_requests.items.len(),
            commits = commits.len(),
            "Merge requests enriched"
        );

        let orphan_filter = OrphanFilter::new(
            CommitEnricher::new(source, project, limiter.clone()),
            self.policy,
        );
        let orphans = orphan_filter.run(&merge_requests.items, commits).await?;

        let mut skipped = merge_requests.skipped;
        skipped.extend(orphans.skipped);

        let timeline = TimelineAssembler::assemble(
            project,
            window,
            merge_requests.items,
            orphans.items,
            skipped,
        );

        info!(
            project = %project,
            merge_requests = timeline.merge_requests.len(),
            orphan_commits = timeline.orphan_commits.len(),
            skipped = timeline.skipped.len(),
            "Timeline complete"
        );

        Ok(timeline)
    }

    /// Build a timeline that stops as soon as `token` is cancelled
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Cancelled` if the token fires first; any
    /// partial results are discarded. Otherwise as [`Self::build`].
    pub async fn build_with_cancellation(
        &self,
        source: Arc<dyn RemoteSource>,
        project: ProjectId,
        window: TimeWindow,
        token: CancellationToken,
    ) -> Result<Timeline, TimelineError> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(project = %project, "Timeline aggregation cancelled");
                Err(TimelineError::Cancelled)
            }
            result = self.build(source, project, window) => result,
        }
    }
}

/// Build a timeline with default options
///
/// # Errors
///
/// See [`TimelineBuilder::build`].
pub async fn build_timeline(
    source: Arc<dyn RemoteSource>,
    project: ProjectId,
    window: TimeWindow,
) -> Result<Timeline, TimelineError> {
    TimelineBuilder::default()
        .build(source, project, window)
        .await
}
