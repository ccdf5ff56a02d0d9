// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for forge-timeline

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors reported by a [`RemoteSource`](crate::source::RemoteSource)
///
/// The aggregation treats every variant the same way when deciding how a
/// failure propagates; the distinction only matters to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Network failure or a 5xx response from the remote API
    #[error("Remote API unavailable: {message}")]
    RemoteUnavailable {
        /// Description of the transport or server failure
        message: String,
    },

    /// Project, merge request, or commit vanished mid-aggregation
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that could not be found
        resource: String,
    },

    /// The credentials supplied to the source are no longer valid
    #[error("Authentication expired")]
    AuthExpired,

    /// The remote API refused the call because of rate limiting
    #[error("Rate limited by remote API")]
    RateLimited {
        /// Seconds until the limit resets, if the API said so
        retry_after: Option<u64>,
    },
}

impl RemoteError {
    /// Shorthand for [`RemoteError::NotFound`]
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for [`RemoteError::RemoteUnavailable`]
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }
}

/// The remote call that was in flight when a failure occurred
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    /// Listing merge requests for the window
    ListMergeRequests,
    /// Listing commits for the window
    ListCommits,
    /// Listing the commits of one merge request
    MergeRequestCommits {
        /// Merge request iid
        iid: u64,
    },
    /// Fetching the diff of one merge request
    MergeRequestDiff {
        /// Merge request iid
        iid: u64,
    },
    /// Fetching the diff of one commit
    CommitDiff {
        /// Commit sha
        sha: String,
    },
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListMergeRequests => write!(f, "list merge requests"),
            Self::ListCommits => write!(f, "list commits"),
            Self::MergeRequestCommits { iid } => write!(f, "list commits of merge request !{iid}"),
            Self::MergeRequestDiff { iid } => write!(f, "fetch diff of merge request !{iid}"),
            Self::CommitDiff { sha } => write!(f, "fetch diff of commit {sha}"),
        }
    }
}

/// Errors that terminate a timeline aggregation
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A remote call failed
    #[error("Failed to {call}: {source}")]
    Remote {
        /// The call that failed
        call: RemoteCall,
        /// The error reported by the source
        #[source]
        source: RemoteError,
    },

    /// The aggregation was cancelled before it completed
    #[error("Timeline aggregation cancelled")]
    Cancelled,

    /// The requested window ends before it starts
    #[error("Invalid time window: end {end} is before start {start}")]
    InvalidWindow {
        /// Window start
        start: DateTime<Utc>,
        /// Window end
        end: DateTime<Utc>,
    },

    /// An enrichment task panicked or was aborted by the runtime
    #[error("Enrichment task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TimelineError {
    /// Wrap a source error with the call that produced it
    #[must_use]
    pub fn remote(call: RemoteCall, source: RemoteError) -> Self {
        Self::Remote { call, source }
    }

    /// The underlying remote error, if this failure came from the source
    #[must_use]
    pub fn remote_error(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}
