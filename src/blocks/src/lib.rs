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

//! Workflow blocks for Cloud Build, Google Kubernetes Engine, and Cloud SQL
//! Admin.
//!
//! A [Block] wraps one REST method: its [endpoint
//! descriptor][gax::descriptor::EndpointDescriptor] declares the inputs, and
//! [Block::run] sends exactly one request through a
//! [Dispatcher][gax::dispatcher::Dispatcher]. Methods returning an Operation
//! resource can also be awaited with [Block::run_until_done], which polls the
//! service's `operations.get` method.
//!
//! The [builtin catalog][Catalog::builtin] covers the commonly used methods of
//! the three services. Other methods can be loaded from the service discovery
//! document with [Catalog::from_discovery_document].
//!
//! # Example
//! ```no_run
//! # use google_cloud_blocks::*;
//! # async fn sample() -> Result<()> {
//! let dispatcher = Dispatcher::builder().with_project_id("my-project").build();
//! let block = Catalog::builtin()
//!     .get("sqladmin.instances.get")
//!     .expect("sqladmin.instances.get is a builtin block");
//! let instance = block
//!     .run(&dispatcher, &Invocation::new().set("instance", "my-instance"))
//!     .await?;
//! println!("{instance}");
//! # Ok(()) }
//! ```

pub use gax::Result;
pub use gax::dispatcher::Dispatcher;
pub use gax::error::Error;
pub use gax::invocation::Invocation;

mod block;
pub use block::{Block, OutputKind};

mod catalog;
pub use catalog::Catalog;

mod discovery;

/// Blocks for the Cloud Build API.
pub mod cloudbuild;

/// Blocks for the Google Kubernetes Engine API.
pub mod container;

/// Blocks for the Cloud SQL Admin API.
pub mod sqladmin;
