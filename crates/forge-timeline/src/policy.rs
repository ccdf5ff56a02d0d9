// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Failure handling for enrichment fan-out
//!
//! By default one failed remote call fails the whole aggregation. With
//! [`FailurePolicy::SkipFailed`] the failed merge request or orphan commit
//! is dropped and recorded as a [`SkippedItem`] instead.

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::warn;

use crate::error::TimelineError;

/// What to do when one enrichment task fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the aggregation on the first failure
    #[default]
    FailFast,
    /// Drop the failed item, record it, and keep going
    SkipFailed,
}

/// The item an enrichment task was working on
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipTarget {
    /// A merge request, with all of its commits
    MergeRequest {
        /// Merge request iid
        iid: u64,
    },
    /// An orphan commit
    Commit {
        /// Commit sha
        sha: String,
    },
}

/// An item left out of a timeline because its enrichment failed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkippedItem {
    /// What was skipped
    pub target: SkipTarget,
    /// Why it was skipped
    pub reason: String,
}

/// Results of a fan-out once every task has been joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T> {
    /// Successfully enriched items, in completion order
    pub items: Vec<T>,
    /// Items dropped under [`FailurePolicy::SkipFailed`]
    pub skipped: Vec<SkippedItem>,
}

impl<T> Default for Settled<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Join every task in the set, applying `policy` to failures
///
/// Only remote failures can be skipped. Cancellation and task panics
/// always end the aggregation. Returning early drops `tasks`, which aborts
/// whatever is still running.
pub(crate) async fn settle<T: Send + 'static>(
    mut tasks: JoinSet<(SkipTarget, Result<T, TimelineError>)>,
    policy: FailurePolicy,
) -> Result<Settled<T>, TimelineError> {
    let mut settled = Settled {
        items: Vec::with_capacity(tasks.len()),
        skipped: Vec::new(),
    };

    while let Some(joined) = tasks.join_next().await {
        let (target, outcome) = joined?;
        match outcome {
            Ok(item) => settled.items.push(item),
            Err(err) if policy == FailurePolicy::SkipFailed && err.remote_error().is_some() => {
                warn!(item = ?target, error = %err, "Skipping failed enrichment");
                settled.skipped.push(SkippedItem {
                    target,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(settled)
}
