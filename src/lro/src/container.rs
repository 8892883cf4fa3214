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
use gax::error::rpc::{Code, Status};
use serde::{Deserialize, Serialize};

/// A GKE `Operation`.
///
/// GKE operations report progress through [status][ContainerOperation::status]
/// and identify themselves with a short `name`. Querying them requires the
/// full resource name, which is recovered from `selfLink`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ContainerOperation {
    /// The short server-assigned name, e.g. `operation-1234-5678`.
    pub name: String,
    pub zone: String,
    pub location: String,
    pub operation_type: String,
    pub status: ContainerOperationStatus,
    pub detail: String,

    /// A textual description of the error. Deprecated by GKE in favor of
    /// `error`, still set by some operations.
    pub status_message: String,

    pub self_link: String,
    pub target_link: String,
    pub start_time: String,
    pub end_time: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

/// The values of [ContainerOperation::status].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ContainerOperationStatus {
    Pending,
    Running,
    Done,
    Aborting,
    #[default]
    #[serde(other)]
    StatusUnspecified,
}

impl ContainerOperation {
    /// The resource name used by `projects.locations.operations.get`.
    ///
    /// Derived from `selfLink`. Operations started through the legacy
    /// `zones` methods link to a `zones/{zone}` resource, the name uses the
    /// equivalent `locations/{zone}` form. Returns `None` when `selfLink` is
    /// missing or does not name an operation.
    pub fn resource_name(&self) -> Option<String> {
        let start = self.self_link.find("/projects/")?;
        let path = &self.self_link[start + 1..];
        if !path.contains("/operations/") {
            return None;
        }
        Some(path.replace("/zones/", "/locations/"))
    }
}

impl DiscoveryOperation for ContainerOperation {
    fn done(&self) -> bool {
        self.status == ContainerOperationStatus::Done
    }

    fn name(&self) -> Option<String> {
        self.resource_name()
            .or_else(|| Some(self.name.clone()).filter(|n| !n.is_empty()))
    }

    fn status(&self) -> Option<Status> {
        if let Some(error) = self.error.as_ref().filter(|e| e.code != Code::Ok) {
            return Some(error.clone());
        }
        if self.done() && !self.status_message.is_empty() {
            return Some(
                Status::default()
                    .set_code(Code::Unknown)
                    .set_message(&self.status_message),
            );
        }
        None
    }
}
