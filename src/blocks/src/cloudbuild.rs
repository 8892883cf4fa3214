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

//! Cloud Build has two API versions. `v1` manages builds and build triggers,
//! `v2` manages connections to source code repositories. Both versions return
//! [google.longrunning.Operation][lro::LongrunningOperation] resources.

use crate::Block;
use gax::descriptor::{EndpointDescriptor, Field, FieldType};
use http::Method;
use lro::Dialect;

/// The Cloud Build service root.
pub const BASE_URL: &str = "https://cloudbuild.googleapis.com/";

/// The builtin Cloud Build blocks.
pub fn blocks() -> Vec<Block> {
    let mut blocks = v1();
    blocks.extend(v2());
    blocks
}

fn endpoint(id: &str, method: Method, path: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(id, method, BASE_URL, path)
}

fn page_fields() -> [Field; 2] {
    [
        Field::query("pageSize", FieldType::Number),
        Field::query("pageToken", FieldType::String),
    ]
}

/// Queries `v1` operations, returned by the build and trigger methods.
pub fn v1_operations_get() -> EndpointDescriptor {
    endpoint("cloudbuild.operations.get", Method::GET, "v1/{+name}")
        .with_field(Field::path("name"))
        .with_description("Gets the latest state of a long-running operation.")
}

/// Queries `v2` operations, returned by the connection methods.
pub fn v2_operations_get() -> EndpointDescriptor {
    endpoint(
        "cloudbuild.projects.locations.operations.get",
        Method::GET,
        "v2/{+name}",
    )
    .with_field(Field::path("name"))
    .with_description("Gets the latest state of a long-running operation.")
}

fn v1_operation(descriptor: EndpointDescriptor) -> Block {
    Block::operation(descriptor, Dialect::Longrunning).with_poll(v1_operations_get(), "name")
}

fn v2_operation(descriptor: EndpointDescriptor) -> Block {
    Block::operation(descriptor, Dialect::Longrunning).with_poll(v2_operations_get(), "name")
}

fn v1() -> Vec<Block> {
    vec![
        v1_operation(
            endpoint(
                "cloudbuild.projects.builds.create",
                Method::POST,
                "v1/projects/{projectId}/builds",
            )
            .with_fields([
                Field::project("projectId"),
                Field::query("parent", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Starts a build with the specified configuration."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.builds.get",
                Method::GET,
                "v1/projects/{projectId}/builds/{id}",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("id"),
                Field::query("name", FieldType::String),
            ])
            .with_description("Returns information about a previously requested build."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.builds.list",
                Method::GET,
                "v1/projects/{projectId}/builds",
            )
            .with_fields([
                Field::project("projectId"),
                Field::query("parent", FieldType::String),
                Field::query("filter", FieldType::String),
            ])
            .with_fields(page_fields())
            .with_description("Lists previously requested builds."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.builds.cancel",
                Method::POST,
                "v1/projects/{projectId}/builds/{id}:cancel",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("id"),
                Field::request_body(),
            ])
            .with_description("Cancels a build in progress."),
        ),
        v1_operation(
            endpoint(
                "cloudbuild.projects.builds.retry",
                Method::POST,
                "v1/projects/{projectId}/builds/{id}:retry",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("id"),
                Field::request_body(),
            ])
            .with_description("Creates a new build based on the specified build."),
        ),
        v1_operation(
            endpoint(
                "cloudbuild.projects.locations.builds.create",
                Method::POST,
                "v1/{+parent}/builds",
            )
            .with_fields([
                Field::path("parent"),
                Field::query("projectId", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Starts a build in a region."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.locations.builds.get",
                Method::GET,
                "v1/{+name}",
            )
            .with_fields([
                Field::path("name"),
                Field::query("projectId", FieldType::String),
                Field::query("id", FieldType::String),
            ])
            .with_description("Returns information about a build in a region."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.triggers.create",
                Method::POST,
                "v1/projects/{projectId}/triggers",
            )
            .with_fields([
                Field::project("projectId"),
                Field::query("parent", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Creates a new `BuildTrigger`."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.triggers.get",
                Method::GET,
                "v1/projects/{projectId}/triggers/{triggerId}",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("triggerId"),
                Field::query("name", FieldType::String),
            ])
            .with_description("Returns information about a `BuildTrigger`."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.triggers.list",
                Method::GET,
                "v1/projects/{projectId}/triggers",
            )
            .with_fields([
                Field::project("projectId"),
                Field::query("parent", FieldType::String),
            ])
            .with_fields(page_fields())
            .with_description("Lists existing `BuildTrigger`s."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.triggers.patch",
                Method::PATCH,
                "v1/projects/{projectId}/triggers/{triggerId}",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("triggerId"),
                Field::query("updateMask", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Updates a `BuildTrigger` by its project ID and trigger ID."),
        ),
        Block::empty(
            endpoint(
                "cloudbuild.projects.triggers.delete",
                Method::DELETE,
                "v1/projects/{projectId}/triggers/{triggerId}",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("triggerId"),
                Field::query("name", FieldType::String),
            ])
            .with_description("Deletes a `BuildTrigger` by its project ID and trigger ID."),
        ),
        v1_operation(
            endpoint(
                "cloudbuild.projects.triggers.run",
                Method::POST,
                "v1/projects/{projectId}/triggers/{triggerId}:run",
            )
            .with_fields([
                Field::project("projectId"),
                Field::path("triggerId"),
                Field::query("name", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Runs a `BuildTrigger` at a particular source revision."),
        ),
        v1_operation(v1_operations_get()),
        Block::empty(
            endpoint("cloudbuild.operations.cancel", Method::POST, "v1/{+name}:cancel")
                .with_fields([Field::path("name"), Field::request_body()])
                .with_description("Starts asynchronous cancellation on a long-running operation."),
        ),
    ]
}

fn v2() -> Vec<Block> {
    vec![
        Block::resource(
            endpoint("cloudbuild.projects.locations.get", Method::GET, "v2/{+name}")
                .with_field(Field::path("name"))
                .with_description("Gets information about a location."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.locations.list",
                Method::GET,
                "v2/{+name}/locations",
            )
            .with_fields([
                Field::path("name"),
                Field::query("filter", FieldType::String),
            ])
            .with_fields(page_fields())
            .with_description("Lists information about the supported locations for this service."),
        ),
        v2_operation(
            endpoint(
                "cloudbuild.projects.locations.connections.create",
                Method::POST,
                "v2/{+parent}/connections",
            )
            .with_fields([
                Field::path("parent"),
                Field::query("connectionId", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Creates a Connection."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.locations.connections.get",
                Method::GET,
                "v2/{+name}",
            )
            .with_field(Field::path("name"))
            .with_description("Gets details of a single connection."),
        ),
        Block::resource(
            endpoint(
                "cloudbuild.projects.locations.connections.list",
                Method::GET,
                "v2/{+parent}/connections",
            )
            .with_field(Field::path("parent"))
            .with_fields(page_fields())
            .with_description("Lists Connections in a given project and location."),
        ),
        v2_operation(
            endpoint(
                "cloudbuild.projects.locations.connections.patch",
                Method::PATCH,
                "v2/{+name}",
            )
            .with_fields([
                Field::path("name"),
                Field::query("updateMask", FieldType::String),
                Field::query("allowMissing", FieldType::Boolean),
                Field::query("etag", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Updates a single connection."),
        ),
        v2_operation(
            endpoint(
                "cloudbuild.projects.locations.connections.delete",
                Method::DELETE,
                "v2/{+name}",
            )
            .with_fields([
                Field::path("name"),
                Field::query("etag", FieldType::String),
                Field::query("validateOnly", FieldType::Boolean),
            ])
            .with_description("Deletes a single connection."),
        ),
        v2_operation(v2_operations_get()),
        Block::empty(
            endpoint(
                "cloudbuild.projects.locations.operations.cancel",
                Method::POST,
                "v2/{+name}:cancel",
            )
            .with_fields([Field::path("name"), Field::request_body()])
            .with_description("Starts asynchronous cancellation on a long-running operation."),
        ),
    ]
}
