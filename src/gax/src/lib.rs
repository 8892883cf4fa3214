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

//! Request dispatch for the Google Cloud workflow blocks.
//!
//! This crate turns an [endpoint descriptor][descriptor::EndpointDescriptor]
//! and an [invocation][invocation::Invocation] into exactly one
//! authenticated HTTP request, and the response into a JSON value or a typed
//! [error][error::Error]. It also defines the policies used to poll
//! long-running operations.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
pub type Result<T> = std::result::Result<T, crate::error::Error>;

pub mod descriptor;

pub mod dispatcher;

/// The error types returned by this crate.
pub mod error;

pub mod exponential_backoff;

/// Caller-provided values for one call of an endpoint.
pub mod invocation;

pub mod loop_state;
pub mod observability;
pub mod options;

pub mod path_template;

pub mod polling_backoff_policy;
pub mod polling_error_policy;

/// Serializes JSON values into query parameters.
pub mod query_parameter;

/// The HTTP requests built by the dispatcher.
pub mod request;
