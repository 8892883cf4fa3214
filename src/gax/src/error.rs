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

mod api_error;
pub use api_error::ApiError;
mod core_error;
pub use core_error::*;
mod validation;
pub use validation::ValidationError;

pub use auth::build_errors::Error as CredentialsBuildError;
pub use auth::errors::CredentialsError;

/// The error model used by Google Cloud services.
///
/// Services return errors as a JSON object in the response body:
///
/// ```norust
/// {
///   "error": {
///     "code": 404,
///     "message": "Requested entity was not found.",
///     "status": "NOT_FOUND",
///     "details": []
///   }
/// }
/// ```
///
/// Long-running operations report failures using the same [Status][rpc::Status]
/// message, with a numeric gRPC code.
///
/// # Examples
///
/// ```
/// # use google_cloud_blocks_gax::error::rpc::{Code, Status};
/// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
/// assert_eq!(status.code.name(), "NOT_FOUND");
/// ```
pub mod rpc;
