// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Project identity and query windows

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Identifier of a project on the remote server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound
    pub start: DateTime<Utc>,
    /// Exclusive upper bound
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting one that ends before it starts
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidWindow` if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimelineError> {
        if end < start {
            return Err(TimelineError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Check whether an instant falls inside the window
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Check whether the window contains no instants
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
