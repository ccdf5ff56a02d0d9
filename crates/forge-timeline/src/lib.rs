// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! forge-timeline: merge request and commit timelines for code-hosting projects
//!
//! This library gathers a project's merge requests and commits over a time
//! window from a [`RemoteSource`], attaches diffs to each of them, and
//! assembles one ordered [`Timeline`]. Commits that belong to no merge
//! request are reported separately as orphans.

#![warn(missing_docs)]

pub mod builder;
pub mod commit;
pub mod diff;
pub mod enrich;
pub mod error;
pub mod limiter;
pub mod merge_request;
pub mod orphan;
pub mod policy;
pub mod project;
pub mod source;
pub mod timeline;

pub use builder::{TimelineBuilder, TimelineOptions, build_timeline};
pub use commit::{CommitRecord, EnrichedCommit};
pub use diff::{ChangeKind, DiffStats, FileChange};
pub use error::{RemoteCall, RemoteError, TimelineError};
pub use limiter::{ConcurrencyLimiter, DEFAULT_CONCURRENCY};
pub use merge_request::{Author, EnrichedMergeRequest, MergeRequestRecord};
pub use policy::{FailurePolicy, SkipTarget, SkippedItem};
pub use project::{ProjectId, TimeWindow};
pub use source::RemoteSource;
pub use timeline::{MergeRequestRow, Timeline};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::builder::{TimelineBuilder, TimelineOptions, build_timeline};
    pub use crate::error::{RemoteError, TimelineError};
    pub use crate::project::{ProjectId, TimeWindow};
    pub use crate::source::RemoteSource;
    pub use crate::timeline::Timeline;
}
