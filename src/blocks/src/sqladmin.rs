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

//! Cloud SQL Admin methods require the `sqlservice.admin` scope in addition
//! to `cloud-platform`. Operations are named by a short id, and queried
//! within the project that started them.

use crate::Block;
use auth::constants::{CLOUD_PLATFORM_SCOPE, SQLSERVICE_ADMIN_SCOPE};
use gax::descriptor::{EndpointDescriptor, Field, FieldType};
use http::Method;
use lro::Dialect;

/// The Cloud SQL Admin service root.
pub const BASE_URL: &str = "https://sqladmin.googleapis.com/";

fn endpoint(id: &str, method: Method, path: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(id, method, BASE_URL, path)
        .with_scopes([CLOUD_PLATFORM_SCOPE, SQLSERVICE_ADMIN_SCOPE])
}

fn instance() -> [Field; 2] {
    [Field::project("project"), Field::path("instance")]
}

fn page_fields() -> [Field; 2] {
    [
        Field::query("maxResults", FieldType::Number),
        Field::query("pageToken", FieldType::String),
    ]
}

/// Queries the operations returned by the mutating methods.
pub fn operations_get() -> EndpointDescriptor {
    endpoint(
        "sqladmin.operations.get",
        Method::GET,
        "v1/projects/{project}/operations/{operation}",
    )
    .with_fields([Field::project("project"), Field::path("operation")])
    .with_description("Retrieves an instance operation that has been performed on an instance.")
}

fn operation(descriptor: EndpointDescriptor) -> Block {
    Block::operation(descriptor, Dialect::Sql).with_poll(operations_get(), "operation")
}

/// The builtin Cloud SQL Admin blocks.
pub fn blocks() -> Vec<Block> {
    vec![
        operation(
            endpoint(
                "sqladmin.instances.insert",
                Method::POST,
                "v1/projects/{project}/instances",
            )
            .with_fields([Field::project("project"), Field::request_body()])
            .with_description("Creates a new Cloud SQL instance."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.instances.get",
                Method::GET,
                "v1/projects/{project}/instances/{instance}",
            )
            .with_fields(instance())
            .with_description("Retrieves a resource containing information about a Cloud SQL instance."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.instances.list",
                Method::GET,
                "v1/projects/{project}/instances",
            )
            .with_fields([
                Field::project("project"),
                Field::query("filter", FieldType::String),
            ])
            .with_fields(page_fields())
            .with_description("Lists instances under a given project."),
        ),
        operation(
            endpoint(
                "sqladmin.instances.patch",
                Method::PATCH,
                "v1/projects/{project}/instances/{instance}",
            )
            .with_fields(instance())
            .with_field(Field::request_body())
            .with_description("Partially updates settings of a Cloud SQL instance by merging the request with the current configuration."),
        ),
        operation(
            endpoint(
                "sqladmin.instances.delete",
                Method::DELETE,
                "v1/projects/{project}/instances/{instance}",
            )
            .with_fields(instance())
            .with_description("Deletes a Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.instances.restart",
                Method::POST,
                "v1/projects/{project}/instances/{instance}/restart",
            )
            .with_fields(instance())
            .with_description("Restarts a Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.databases.insert",
                Method::POST,
                "v1/projects/{project}/instances/{instance}/databases",
            )
            .with_fields(instance())
            .with_field(Field::request_body())
            .with_description("Inserts a resource containing information about a database inside a Cloud SQL instance."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.databases.get",
                Method::GET,
                "v1/projects/{project}/instances/{instance}/databases/{database}",
            )
            .with_fields(instance())
            .with_field(Field::path("database"))
            .with_description("Retrieves a resource containing information about a database inside a Cloud SQL instance."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.databases.list",
                Method::GET,
                "v1/projects/{project}/instances/{instance}/databases",
            )
            .with_fields(instance())
            .with_description("Lists databases in the specified Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.databases.delete",
                Method::DELETE,
                "v1/projects/{project}/instances/{instance}/databases/{database}",
            )
            .with_fields(instance())
            .with_field(Field::path("database"))
            .with_description("Deletes a database from a Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.users.insert",
                Method::POST,
                "v1/projects/{project}/instances/{instance}/users",
            )
            .with_fields(instance())
            .with_field(Field::request_body())
            .with_description("Creates a new user in a Cloud SQL instance."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.users.list",
                Method::GET,
                "v1/projects/{project}/instances/{instance}/users",
            )
            .with_fields(instance())
            .with_description("Lists users in the specified Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.users.update",
                Method::PUT,
                "v1/projects/{project}/instances/{instance}/users",
            )
            .with_fields(instance())
            .with_fields([
                Field::query("name", FieldType::String),
                Field::query("host", FieldType::String),
                Field::request_body(),
            ])
            .with_description("Updates an existing user in a Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.users.delete",
                Method::DELETE,
                "v1/projects/{project}/instances/{instance}/users",
            )
            .with_fields(instance())
            .with_fields([
                Field::query("name", FieldType::String),
                Field::query("host", FieldType::String),
            ])
            .with_description("Deletes a user from a Cloud SQL instance."),
        ),
        operation(
            endpoint(
                "sqladmin.backupRuns.insert",
                Method::POST,
                "v1/projects/{project}/instances/{instance}/backupRuns",
            )
            .with_fields(instance())
            .with_field(Field::request_body())
            .with_description("Creates a new backup run on demand."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.backupRuns.get",
                Method::GET,
                "v1/projects/{project}/instances/{instance}/backupRuns/{id}",
            )
            .with_fields(instance())
            .with_field(Field::path("id"))
            .with_description("Retrieves a resource containing information about a backup run."),
        ),
        Block::resource(
            endpoint(
                "sqladmin.backupRuns.list",
                Method::GET,
                "v1/projects/{project}/instances/{instance}/backupRuns",
            )
            .with_fields(instance())
            .with_fields(page_fields())
            .with_description("Lists all backup runs associated with the project or a given instance and configuration in the reverse chronological order of the backup initiation time."),
        ),
        operation(
            endpoint(
                "sqladmin.backupRuns.delete",
                Method::DELETE,
                "v1/projects/{project}/instances/{instance}/backupRuns/{id}",
            )
            .with_fields(instance())
            .with_field(Field::path("id"))
            .with_description("Deletes the backup taken by a backup run."),
        ),
        operation(operations_get()),
        Block::resource(
            endpoint(
                "sqladmin.operations.list",
                Method::GET,
                "v1/projects/{project}/operations",
            )
            .with_fields([
                Field::project("project"),
                Field::query("instance", FieldType::String),
            ])
            .with_fields(page_fields())
            .with_description("Lists all instance operations that have been performed on the given Cloud SQL instance in the reverse chronological order of the start time."),
        ),
        Block::empty(
            endpoint(
                "sqladmin.operations.cancel",
                Method::POST,
                "v1/projects/{project}/operations/{operation}/cancel",
            )
            .with_fields([Field::project("project"), Field::path("operation")])
            .with_description("Cancels an instance operation that has been performed on an instance."),
        ),
        Block::resource(
            endpoint("sqladmin.flags.list", Method::GET, "v1/flags")
                .with_field(Field::query("databaseVersion", FieldType::String))
                .with_description("Lists all available database flags for Cloud SQL instances."),
        ),
        Block::resource(
            endpoint("sqladmin.tiers.list", Method::GET, "v1/projects/{project}/tiers")
                .with_field(Field::project("project"))
                .with_description("Lists all available machine types (tiers) for Cloud SQL."),
        ),
    ]
}
