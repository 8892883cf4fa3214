// Copyright 2025 Google LLC
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

use crate::{DiscoveryOperation, PollingResult};
use gax::Result;
use gax::error::Error;
use gax::loop_state::LoopState;
use gax::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use gax::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyArg};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Starts a long-running operation and polls it until it completes.
///
/// The poller is driven by two closures: `start` starts the operation and
/// returns its first state, `query` receives the operation
/// [name][DiscoveryOperation::name] and returns its current state.
///
/// # Example
/// ```
/// # use google_cloud_blocks_lro::{Poller, LongrunningOperation};
/// # use gax::polling_error_policy::{Aip194Strict, PollingErrorPolicyExt};
/// # async fn sample() -> gax::Result<()> {
/// let start = || async {
///     Ok(serde_json::from_value::<LongrunningOperation>(serde_json::json!({
///         "name": "operations/op-1"
///     })).unwrap_or_default())
/// };
/// let query = |_name: String| async {
///     Ok(serde_json::from_value::<LongrunningOperation>(serde_json::json!({
///         "name": "operations/op-1", "done": true
///     })).unwrap_or_default())
/// };
/// let op = Poller::new(start, query)
///     .with_polling_error_policy(Aip194Strict.with_attempt_limit(10))
///     .until_done()
///     .await?;
/// assert!(op.done);
/// # Ok(()) }
/// ```
pub struct Poller<S, Q> {
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    start: Option<S>,
    query: Q,
    operation: Option<String>,
    loop_start: Instant,
    attempt_count: u32,
}

impl<S, Q> Poller<S, Q> {
    /// Creates a poller with the default policies.
    ///
    /// The default error policy continues on the errors listed in
    /// [Aip194Strict][gax::polling_error_policy::Aip194Strict], for a limited
    /// number of attempts. The default backoff policy is
    /// [ExponentialBackoff][gax::exponential_backoff::ExponentialBackoff].
    pub fn new(start: S, query: Q) -> Self {
        Self {
            error_policy: PollingErrorPolicyArg::default().policy(),
            backoff_policy: PollingBackoffPolicyArg::default().policy(),
            start: Some(start),
            query,
            operation: None,
            loop_start: Instant::now(),
            attempt_count: 0,
        }
    }

    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.error_policy = v.into().policy();
        self
    }

    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.backoff_policy = v.into().policy();
        self
    }
}

impl<S, SF, Q, QF, O> Poller<S, Q>
where
    O: DiscoveryOperation,
    S: FnOnce() -> SF,
    SF: Future<Output = Result<O>>,
    Q: FnMut(String) -> QF,
    QF: Future<Output = Result<O>>,
{
    /// Runs one step: starts the operation, or queries it once.
    ///
    /// Returns `None` after a [Completed][PollingResult::Completed] result.
    pub async fn poll(&mut self) -> Option<PollingResult<O>> {
        if let Some(start) = self.start.take() {
            self.loop_start = Instant::now();
            let (name, result) = handle_start(start().await);
            self.operation = name;
            return Some(result);
        }
        let name = self.operation.take()?;
        self.attempt_count += 1;
        tracing::debug!(
            operation = name.as_str(),
            attempt = self.attempt_count,
            "polling long-running operation"
        );
        let result = (self.query)(name.clone()).await;
        let (name, result) = self.handle_poll(name, result);
        self.operation = name;
        Some(result)
    }

    /// Polls until the operation completes, waiting between queries.
    ///
    /// Returns the completed operation, or the error that stopped the loop:
    /// an operation that completed with an error yields [Error::service].
    pub async fn until_done(mut self) -> Result<O> {
        while let Some(result) = self.poll().await {
            match result {
                PollingResult::Completed(r) => return r,
                PollingResult::InProgress(_) | PollingResult::PollingError(_) => {}
            }
            let wait = self
                .backoff_policy
                .wait_period(self.loop_start, self.attempt_count);
            tokio::time::sleep(wait).await;
        }
        Err(Error::exhausted("the polling loop has already completed"))
    }

    fn handle_poll(&self, name: String, result: Result<O>) -> (Option<String>, PollingResult<O>) {
        match result {
            Err(e) => {
                match self
                    .error_policy
                    .on_error(self.loop_start, self.attempt_count, e)
                {
                    LoopState::Continue(e) => (Some(name), PollingResult::PollingError(e)),
                    LoopState::Exhausted(e) | LoopState::Permanent(e) => {
                        (None, PollingResult::Completed(Err(e)))
                    }
                }
            }
            Ok(o) if o.done() => (None, handle_done(o)),
            Ok(o) => {
                let (next, result) = handle_in_progress(o);
                let Some(next) = next else {
                    return (None, result);
                };
                match self
                    .error_policy
                    .on_in_progress(self.loop_start, self.attempt_count, &next)
                {
                    Some(e) => (None, PollingResult::Completed(Err(e))),
                    None => (Some(next), result),
                }
            }
        }
    }
}

fn handle_start<O>(result: Result<O>) -> (Option<String>, PollingResult<O>)
where
    O: DiscoveryOperation,
{
    match result {
        Err(e) => (None, PollingResult::Completed(Err(e))),
        Ok(o) if o.done() => (None, handle_done(o)),
        Ok(o) => handle_in_progress(o),
    }
}

fn handle_done<O>(o: O) -> PollingResult<O>
where
    O: DiscoveryOperation,
{
    match o.status() {
        None => PollingResult::Completed(Ok(o)),
        Some(s) => PollingResult::Completed(Err(Error::service(s))),
    }
}

fn handle_in_progress<O>(o: O) -> (Option<String>, PollingResult<O>)
where
    O: DiscoveryOperation,
{
    if let Some(s) = o.status() {
        return (None, PollingResult::Completed(Err(Error::service(s))));
    }
    match o.name() {
        Some(name) => (Some(name), PollingResult::InProgress(Some(o))),
        None => (
            None,
            PollingResult::Completed(Err(Error::deser(
                "the operation is still running but has no name to poll",
            ))),
        ),
    }
}
