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

/// A Cloud SQL Admin `Operation`.
///
/// The `name` is a server-assigned id, queried with
/// `sqladmin.operations.get` in the `targetProject`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct SqlOperation {
    pub kind: String,
    pub name: String,
    pub operation_type: String,
    pub status: SqlOperationStatus,
    pub target_id: String,
    pub target_project: String,
    pub target_link: String,
    pub self_link: String,
    pub user: String,
    pub insert_time: String,
    pub start_time: String,
    pub end_time: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SqlOperationErrors>,
}

/// The values of [SqlOperation::status].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SqlOperationStatus {
    Pending,
    Running,
    Done,
    #[default]
    #[serde(other)]
    SqlOperationStatusUnspecified,
}

/// The errors of a failed [SqlOperation].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct SqlOperationErrors {
    pub kind: String,
    pub errors: Vec<SqlOperationError>,
}

/// One error in [SqlOperationErrors].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct SqlOperationError {
    pub kind: String,
    /// An identifier for the error, e.g. `ERROR_RDBMS`.
    pub code: String,
    pub message: String,
}

impl SqlOperation {
    fn errors(&self) -> &[SqlOperationError] {
        self.error.as_ref().map(|e| e.errors.as_slice()).unwrap_or_default()
    }
}

impl DiscoveryOperation for SqlOperation {
    fn done(&self) -> bool {
        self.status == SqlOperationStatus::Done
    }

    fn name(&self) -> Option<String> {
        Some(self.name.clone()).filter(|n| !n.is_empty())
    }

    /// Cloud SQL reports errors as a list of `{code, message}` pairs. The
    /// list becomes a [Status] with code `UNKNOWN`, a message joining all the
    /// errors, and one detail per error.
    fn status(&self) -> Option<Status> {
        let errors = self.errors();
        if errors.is_empty() {
            return None;
        }
        let message = errors
            .iter()
            .map(|e| match (e.code.as_str(), e.message.as_str()) {
                (code, "") => code.to_string(),
                ("", message) => message.to_string(),
                (code, message) => format!("{code}: {message}"),
            })
            .collect::<Vec<_>>()
            .join("; ");
        let details = errors
            .iter()
            .filter_map(|e| serde_json::to_value(e).ok())
            .collect::<Vec<_>>();
        Some(
            Status::default()
                .set_code(Code::Unknown)
                .set_message(message)
                .set_details(details),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn running() -> anyhow::Result<()> {
        let op = serde_json::from_value::<SqlOperation>(json!({
            "kind": "sql#operation",
            "name": "a1b2c3d4-0000-1111-2222-333344445555",
            "operationType": "CREATE",
            "status": "PENDING",
            "targetId": "db-1",
            "targetProject": "my-project",
        }))?;
        assert!(!op.done());
        assert!(op.status().is_none(), "{op:?}");
        assert_eq!(
            op.name().as_deref(),
            Some("a1b2c3d4-0000-1111-2222-333344445555")
        );
        Ok(())
    }

    #[test]
    fn done() -> anyhow::Result<()> {
        let op = serde_json::from_value::<SqlOperation>(json!({
            "name": "op-1",
            "status": "DONE",
        }))?;
        assert!(op.done());
        assert!(op.status().is_none(), "{op:?}");
        Ok(())
    }

    #[test]
    fn done_with_errors() -> anyhow::Result<()> {
        let op = serde_json::from_value::<SqlOperation>(json!({
            "name": "op-1",
            "status": "DONE",
            "error": {
                "kind": "sql#operationErrors",
                "errors": [
                    {"kind": "sql#operationError", "code": "ERROR_RDBMS", "message": "database is busy"},
                    {"kind": "sql#operationError", "code": "INTERNAL_ERROR"},
                ],
            },
        }))?;
        assert!(op.done());
        let status = op.status().unwrap();
        assert_eq!(status.code, Code::Unknown);
        assert_eq!(status.message, "ERROR_RDBMS: database is busy; INTERNAL_ERROR");
        assert_eq!(status.details.len(), 2);
        assert_eq!(status.details[0]["code"], "ERROR_RDBMS");
        Ok(())
    }

    #[test]
    fn empty_errors() -> anyhow::Result<()> {
        let op = serde_json::from_value::<SqlOperation>(json!({
            "name": "op-1",
            "status": "DONE",
            "error": {"errors": []},
        }))?;
        assert!(op.status().is_none(), "{op:?}");
        Ok(())
    }

    #[test]
    fn unknown_status() -> anyhow::Result<()> {
        let op = serde_json::from_value::<SqlOperation>(json!({
            "name": "op-1",
            "status": "SOMETHING_NEW",
        }))?;
        assert_eq!(op.status, SqlOperationStatus::SqlOperationStatusUnspecified);
        assert!(!op.done());

        let op = serde_json::from_value::<SqlOperation>(json!({
            "name": "op-1",
            "status": "RUNNING",
        }))?;
        assert_eq!(op.status, SqlOperationStatus::Running);
        Ok(())
    }
}
