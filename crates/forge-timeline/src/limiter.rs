// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Bounded concurrency for remote calls
//!
//! Every remote call made during an aggregation goes through a
//! [`ConcurrencyLimiter`]. A permit is held only for the duration of the
//! call itself, never while waiting on other tasks, so nested fan-out
//! (merge requests spawning commit tasks) cannot exhaust the permits and
//! deadlock.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::{RemoteCall, RemoteError, TimelineError};

/// Default number of remote calls allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Caps the number of in-flight remote calls
///
/// Cloning is cheap and clones share the same permits.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter allowing `limit` concurrent calls (at least one)
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Maximum number of concurrent calls
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of permits currently free
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run one remote call once a permit is available
    ///
    /// Failures are tagged with `call` so the caller can tell which request
    /// broke the aggregation.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Remote` if the call fails, or
    /// `TimelineError::Cancelled` if the limiter has been closed.
    pub async fn run<T, F>(&self, call: RemoteCall, request: F) -> Result<T, TimelineError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TimelineError::Cancelled)?;
        request
            .await
            .map_err(|source| TimelineError::remote(call, source))
    }

    /// Stop handing out permits
    ///
    /// Calls waiting for a permit, and any later calls, fail with
    /// `TimelineError::Cancelled`. Calls already running are unaffected.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}
