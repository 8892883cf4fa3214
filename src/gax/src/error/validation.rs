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

use crate::descriptor::FieldType;

/// Problems detected in an invocation before any request is sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error(
        "missing project for field `{0}`, configure a project id or provide the field in the invocation"
    )]
    MissingProject(String),
    #[error("the path template references `{{{0}}}`, which is not a field of the endpoint")]
    UnknownPlaceholder(String),
    #[error("malformed path template `{0}`")]
    MalformedTemplate(String),
    #[error("the value of path field `{0}` must be a string or a number")]
    InvalidPathValue(String),
    #[error("field `{field}` should be of type {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        got: &'static str,
    },
    #[error("cannot create a valid URL from `{0}`")]
    InvalidUrl(String),
    #[error("`{0}` starts a long-running operation but has no method to poll it")]
    MissingPollMethod(String),
}
