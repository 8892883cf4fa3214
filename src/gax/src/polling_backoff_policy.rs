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

//! The trait for polling backoff policies.
//!
//! Polling a long-running operation too often wastes quota, polling too
//! rarely adds latency. A [PollingBackoffPolicy] picks the wait between
//! polls. Unlike retry backoff these policies use no jitter: the service
//! completes the operation on its own schedule, spreading polls randomly
//! does not help it.
//!
//! # Example
//! ```
//! # use google_cloud_blocks_gax::exponential_backoff::{Error, ExponentialBackoffBuilder};
//! use std::time::Duration;
//! let policy = ExponentialBackoffBuilder::new()
//!     .with_initial_delay(Duration::from_millis(500))
//!     .with_maximum_delay(Duration::from_secs(30))
//!     .build()?;
//! # Ok::<(), Error>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Computes the wait between polls.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns how long to wait before the next poll.
    ///
    /// # Parameters
    /// * `loop_start` - when the polling loop started.
    /// * `attempt_count` - the number of polls so far. Always at least 1.
    fn wait_period(&self, loop_start: Instant, attempt_count: u32) -> Duration;
}

/// Wraps any [PollingBackoffPolicy] for use in builders.
#[derive(Clone, Debug)]
pub struct PollingBackoffPolicyArg(pub(crate) Arc<dyn PollingBackoffPolicy>);

impl PollingBackoffPolicyArg {
    /// Returns the wrapped policy.
    pub fn policy(&self) -> Arc<dyn PollingBackoffPolicy> {
        self.0.clone()
    }
}

impl<T: PollingBackoffPolicy + 'static> From<T> for PollingBackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl From<Arc<dyn PollingBackoffPolicy>> for PollingBackoffPolicyArg {
    fn from(value: Arc<dyn PollingBackoffPolicy>) -> Self {
        Self(value)
    }
}

impl Default for PollingBackoffPolicyArg {
    fn default() -> Self {
        Self::from(crate::exponential_backoff::ExponentialBackoff::default())
    }
}
