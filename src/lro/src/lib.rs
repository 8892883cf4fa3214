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

//! Helpers to wait for long-running operations.
//!
//! Cloud Build, GKE, and Cloud SQL Admin return an "Operation" resource from
//! mutating methods. The three services use different shapes for it:
//!
//! * Cloud Build returns a [google.longrunning.Operation][LongrunningOperation],
//!   with a `done` flag and a `google.rpc.Status` error.
//! * GKE returns a [ContainerOperation], with a `status` enum and a
//!   `selfLink` naming the operation resource.
//! * Cloud SQL Admin returns a [SqlOperation], with a `status` enum and a
//!   list of errors.
//!
//! Each shape implements [DiscoveryOperation]. A [Poller] starts the
//! operation, then queries it until it completes, consulting a
//! [PollingErrorPolicy] on failed queries and a [PollingBackoffPolicy]
//! between queries.
//!
//! [PollingErrorPolicy]: gax::polling_error_policy::PollingErrorPolicy
//! [PollingBackoffPolicy]: gax::polling_backoff_policy::PollingBackoffPolicy

use gax::Result;
use gax::error::Error;
use gax::error::rpc::Status;

mod container;
mod dialect;
mod longrunning;
mod poller;
mod sqladmin;

pub use container::{ContainerOperation, ContainerOperationStatus};
pub use dialect::{Dialect, Operation};
pub use longrunning::LongrunningOperation;
pub use poller::Poller;
pub use sqladmin::{SqlOperation, SqlOperationError, SqlOperationErrors, SqlOperationStatus};

/// The result of one step of a [Poller].
#[derive(Debug)]
pub enum PollingResult<O> {
    /// The operation is still running.
    InProgress(Option<O>),

    /// The operation completed, successfully or not, or the polling policy
    /// stopped the loop.
    Completed(Result<O>),

    /// Querying the operation failed, and the polling policy decided the
    /// error may go away. The loop continues.
    PollingError(Error),
}

/// The operations of a discovery-based service.
///
/// Implementations decide whether the operation completed, whether it
/// completed with an error, and which name to use when querying it again.
pub trait DiscoveryOperation {
    /// Returns true if the operation has completed, with or without an error.
    fn done(&self) -> bool;

    /// Returns the name used to query the operation.
    ///
    /// If `None` the operation cannot be polled.
    fn name(&self) -> Option<String>;

    /// Returns the error of a failed operation, converted to a [Status].
    ///
    /// Returns `None` while the operation is running, and once it completes
    /// successfully.
    fn status(&self) -> Option<Status>;
}
