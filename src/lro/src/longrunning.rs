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

use crate::DiscoveryOperation;
use gax::error::rpc::Status;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `google.longrunning.Operation`, as returned by Cloud Build.
///
/// The operation completed once `done` is true. At that point exactly one of
/// `error` or `response` is set.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct LongrunningOperation {
    /// The server-assigned name, e.g. `operations/build/my-project/abc123`
    /// or `projects/my-project/locations/us-central1/operations/abc123`.
    pub name: String,

    /// Service-specific metadata, such as the build in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    pub done: bool,

    /// The error of an operation that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    /// The result of an operation that succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl DiscoveryOperation for LongrunningOperation {
    fn done(&self) -> bool {
        self.done
    }

    fn name(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }

    fn status(&self) -> Option<Status> {
        self.error.clone()
    }
}
