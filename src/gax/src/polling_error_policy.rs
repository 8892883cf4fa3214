// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Policies deciding when a long-running operation poll loop stops.
//!
//! Polling an operation fails from time to time: the connection drops, the
//! token endpoint hiccups, the service is briefly unavailable. A
//! [PollingErrorPolicy] decides which of these failures are worth another
//! poll, and for how long the loop may keep going.
//!
//! # Example
//! ```
//! # use google_cloud_blocks_gax::polling_error_policy::*;
//! use std::time::Duration;
//! let policy = Aip194Strict
//!     .with_attempt_limit(20)
//!     .with_time_limit(Duration::from_secs(15 * 60));
//! ```

use crate::error::Error;
use crate::error::rpc::Code;
use crate::loop_state::LoopState;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Decides whether a polling loop continues after a failure.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Classifies an error returned by a poll.
    ///
    /// # Parameters
    /// * `loop_start` - when the polling loop started.
    /// * `attempt_count` - the number of polls so far, including this one.
    /// * `error` - the error returned by the poll.
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> LoopState;

    /// Called when a poll succeeds but the operation is still running.
    ///
    /// Returns an error to stop the loop. The default never stops it.
    fn on_in_progress(
        &self,
        _loop_start: Instant,
        _attempt_count: u32,
        _operation_name: &str,
    ) -> Option<Error> {
        None
    }
}

/// Wraps any [PollingErrorPolicy] for use in builders.
#[derive(Clone, Debug)]
pub struct PollingErrorPolicyArg(pub(crate) Arc<dyn PollingErrorPolicy>);

impl PollingErrorPolicyArg {
    /// Returns the wrapped policy.
    pub fn policy(&self) -> Arc<dyn PollingErrorPolicy> {
        self.0.clone()
    }
}

impl<T: PollingErrorPolicy + 'static> From<T> for PollingErrorPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl From<Arc<dyn PollingErrorPolicy>> for PollingErrorPolicyArg {
    fn from(value: Arc<dyn PollingErrorPolicy>) -> Self {
        Self(value)
    }
}

impl Default for PollingErrorPolicyArg {
    fn default() -> Self {
        Self::from(Aip194Strict.with_attempt_limit(DEFAULT_ATTEMPT_LIMIT))
    }
}

/// The number of polls allowed by the default policy.
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 100;

/// Adds limits to any [PollingErrorPolicy].
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Stops the loop once `maximum_duration` has elapsed since it started.
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Stops the loop after `maximum_attempts` polls.
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// Continues only on errors that [AIP-194] considers safe to retry.
///
/// Polling is idempotent, so the loop continues on transport errors,
/// transient authentication errors, and `UNAVAILABLE` (HTTP 503) responses.
/// Every other error stops the loop.
///
/// This policy never limits the number of polls, decorate it with
/// [PollingErrorPolicyExt] for that.
///
/// [AIP-194]: https://google.aip.dev/194
#[derive(Clone, Debug)]
pub struct Aip194Strict;

impl PollingErrorPolicy for Aip194Strict {
    fn on_error(&self, _loop_start: Instant, _attempt_count: u32, error: Error) -> LoopState {
        if error.is_transient_authentication() || error.is_io() {
            return LoopState::Continue(error);
        }
        if error.http_status_code() == Some(503) {
            return LoopState::Continue(error);
        }
        if error.status().is_some_and(|s| s.code == Code::Unavailable) {
            return LoopState::Continue(error);
        }
        LoopState::Permanent(error)
    }
}

/// Continues on every error.
///
/// Only useful in tests, or decorated with limits.
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(&self, _loop_start: Instant, _attempt_count: u32, error: Error) -> LoopState {
        LoopState::Continue(error)
    }
}

/// Limits the time spent polling.
///
/// Results from the inner policy pass through until `maximum_duration` has
/// elapsed. After that any [Continue][LoopState::Continue] becomes
/// [Exhausted][LoopState::Exhausted], and polls that find the operation still
/// running stop the loop with an [Exhausted] error.
#[derive(Debug)]
pub struct LimitedElapsedTime<P = Aip194Strict>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: Duration,
}

impl LimitedElapsedTime {
    /// Limits [Aip194Strict] to `maximum_duration`.
    pub fn new(maximum_duration: Duration) -> Self {
        Self::custom(Aip194Strict, maximum_duration)
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Limits `inner` to `maximum_duration`.
    pub fn custom(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn expired(&self, loop_start: Instant) -> bool {
        Instant::now() >= loop_start + self.maximum_duration
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> LoopState {
        match self.inner.on_error(loop_start, attempt_count, error) {
            LoopState::Continue(e) if self.expired(loop_start) => LoopState::Exhausted(e),
            state => state,
        }
    }

    fn on_in_progress(
        &self,
        loop_start: Instant,
        attempt_count: u32,
        operation_name: &str,
    ) -> Option<Error> {
        if let Some(e) = self
            .inner
            .on_in_progress(loop_start, attempt_count, operation_name)
        {
            return Some(e);
        }
        if !self.expired(loop_start) {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "elapsed time",
            format!("{:?}", Instant::now().saturating_duration_since(loop_start)),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

/// Limits the number of polls.
///
/// Results from the inner policy pass through while
/// `attempt_count < maximum_attempts`. After that any
/// [Continue][LoopState::Continue] becomes [Exhausted][LoopState::Exhausted].
#[derive(Debug)]
pub struct LimitedAttemptCount<P = Aip194Strict>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Limits [Aip194Strict] to `maximum_attempts`.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_blocks_gax::polling_error_policy::*;
    /// use google_cloud_blocks_gax::error::Error;
    /// use std::time::Instant;
    /// let policy = LimitedAttemptCount::new(5);
    /// let state = policy.on_error(Instant::now(), 5, Error::io("connection reset"));
    /// assert!(state.is_exhausted());
    /// ```
    pub fn new(maximum_attempts: u32) -> Self {
        Self::custom(Aip194Strict, maximum_attempts)
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Limits `inner` to `maximum_attempts`.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> LoopState {
        match self.inner.on_error(loop_start, attempt_count, error) {
            LoopState::Continue(e) if attempt_count >= self.maximum_attempts => {
                LoopState::Exhausted(e)
            }
            state => state,
        }
    }

    fn on_in_progress(
        &self,
        loop_start: Instant,
        attempt_count: u32,
        operation_name: &str,
    ) -> Option<Error> {
        if let Some(e) = self
            .inner
            .on_in_progress(loop_start, attempt_count, operation_name)
        {
            return Some(e);
        }
        if attempt_count < self.maximum_attempts {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "attempt count",
            attempt_count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

/// The source of [Error::exhausted] errors raised by the limiting policies.
#[derive(Debug)]
pub struct Exhausted {
    operation_name: String,
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(
        operation_name: &str,
        limit_name: &'static str,
        value: String,
        limit: String,
    ) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            limit_name,
            value,
            limit,
        }
    }

    /// The name of the operation being polled.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }
}

impl std::fmt::Display for Exhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "polling loop for {} exhausted, {} value ({}) exceeds limit ({})",
            self.operation_name, self.limit_name, self.value, self.limit
        )
    }
}

impl std::error::Error for Exhausted {}
