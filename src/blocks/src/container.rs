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

//! GKE exposes each resource twice: under `projects/*/locations/*`, and under
//! the legacy `projects/*/zones/*` form. Operations returned by either form
//! are polled through the `locations` form, using the operation `selfLink`.

use crate::Block;
use gax::descriptor::{EndpointDescriptor, Field, FieldType};
use http::Method;
use lro::Dialect;

/// The GKE service root.
pub const BASE_URL: &str = "https://container.googleapis.com/";

/// The builtin GKE blocks.
pub fn blocks() -> Vec<Block> {
    let mut blocks = locations();
    blocks.extend(zones());
    blocks
}

fn endpoint(id: &str, method: Method, path: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(id, method, BASE_URL, path)
}

/// Queries the operations returned by the cluster and node pool methods.
pub fn operations_get() -> EndpointDescriptor {
    endpoint(
        "container.projects.locations.operations.get",
        Method::GET,
        "v1/{+name}",
    )
    .with_field(Field::path("name"))
    .with_description("Gets the specified operation.")
}

fn operation(descriptor: EndpointDescriptor) -> Block {
    Block::operation(descriptor, Dialect::Container).with_poll(operations_get(), "name")
}

fn locations() -> Vec<Block> {
    vec![
        operation(
            endpoint(
                "container.projects.locations.clusters.create",
                Method::POST,
                "v1/{+parent}/clusters",
            )
            .with_fields([Field::path("parent"), Field::request_body()])
            .with_description("Creates a cluster, consisting of the specified number and type of Google Compute Engine instances."),
        ),
        Block::resource(
            endpoint(
                "container.projects.locations.clusters.get",
                Method::GET,
                "v1/{+name}",
            )
            .with_field(Field::path("name"))
            .with_description("Gets the details of a specific cluster."),
        ),
        Block::resource(
            endpoint(
                "container.projects.locations.clusters.list",
                Method::GET,
                "v1/{+parent}/clusters",
            )
            .with_field(Field::path("parent"))
            .with_description("Lists all clusters owned by a project in either the specified zone or all zones."),
        ),
        operation(
            endpoint(
                "container.projects.locations.clusters.update",
                Method::PUT,
                "v1/{+name}",
            )
            .with_fields([Field::path("name"), Field::request_body()])
            .with_description("Updates the settings of a specific cluster."),
        ),
        operation(
            endpoint(
                "container.projects.locations.clusters.delete",
                Method::DELETE,
                "v1/{+name}",
            )
            .with_field(Field::path("name"))
            .with_description("Deletes the cluster, including the Kubernetes endpoint and all worker nodes."),
        ),
        operation(
            endpoint(
                "container.projects.locations.clusters.nodePools.create",
                Method::POST,
                "v1/{+parent}/nodePools",
            )
            .with_fields([Field::path("parent"), Field::request_body()])
            .with_description("Creates a node pool for a cluster."),
        ),
        Block::resource(
            endpoint(
                "container.projects.locations.clusters.nodePools.get",
                Method::GET,
                "v1/{+name}",
            )
            .with_field(Field::path("name"))
            .with_description("Retrieves the requested node pool."),
        ),
        Block::resource(
            endpoint(
                "container.projects.locations.clusters.nodePools.list",
                Method::GET,
                "v1/{+parent}/nodePools",
            )
            .with_field(Field::path("parent"))
            .with_description("Lists the node pools for a cluster."),
        ),
        operation(
            endpoint(
                "container.projects.locations.clusters.nodePools.setSize",
                Method::POST,
                "v1/{+name}:setSize",
            )
            .with_fields([Field::path("name"), Field::request_body()])
            .with_description("Sets the size for a specific node pool."),
        ),
        operation(
            endpoint(
                "container.projects.locations.clusters.nodePools.delete",
                Method::DELETE,
                "v1/{+name}",
            )
            .with_field(Field::path("name"))
            .with_description("Deletes a node pool from a cluster."),
        ),
        operation(operations_get()),
        Block::resource(
            endpoint(
                "container.projects.locations.operations.list",
                Method::GET,
                "v1/{+parent}/operations",
            )
            .with_field(Field::path("parent"))
            .with_description("Lists all operations in a project in a specific zone or all zones."),
        ),
        Block::empty(
            endpoint(
                "container.projects.locations.operations.cancel",
                Method::POST,
                "v1/{+name}:cancel",
            )
            .with_fields([Field::path("name"), Field::request_body()])
            .with_description("Cancels the specified operation."),
        ),
        Block::resource(
            endpoint(
                "container.projects.locations.getServerConfig",
                Method::GET,
                "v1/{+name}/serverConfig",
            )
            .with_field(Field::path("name"))
            .with_description("Returns configuration info about the Google Kubernetes Engine service."),
        ),
    ]
}

fn zones() -> Vec<Block> {
    let zone = || [Field::project("projectId"), Field::path("zone")];
    let cluster = || {
        [
            Field::project("projectId"),
            Field::path("zone"),
            Field::path("clusterId"),
        ]
    };
    vec![
        operation(
            endpoint(
                "container.projects.zones.clusters.create",
                Method::POST,
                "v1/projects/{projectId}/zones/{zone}/clusters",
            )
            .with_fields(zone())
            .with_field(Field::request_body())
            .with_description("Creates a cluster, consisting of the specified number and type of Google Compute Engine instances."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.clusters.get",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}",
            )
            .with_fields(cluster())
            .with_description("Gets the details of a specific cluster."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.clusters.list",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/clusters",
            )
            .with_fields(zone())
            .with_field(Field::query("parent", FieldType::String))
            .with_description("Lists all clusters owned by a project in either the specified zone or all zones."),
        ),
        operation(
            endpoint(
                "container.projects.zones.clusters.delete",
                Method::DELETE,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}",
            )
            .with_fields(cluster())
            .with_field(Field::query("name", FieldType::String))
            .with_description("Deletes the cluster, including the Kubernetes endpoint and all worker nodes."),
        ),
        operation(
            endpoint(
                "container.projects.zones.clusters.nodePools.create",
                Method::POST,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}/nodePools",
            )
            .with_fields(cluster())
            .with_field(Field::request_body())
            .with_description("Creates a node pool for a cluster."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.clusters.nodePools.get",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}/nodePools/{nodePoolId}",
            )
            .with_fields(cluster())
            .with_field(Field::path("nodePoolId"))
            .with_description("Retrieves the requested node pool."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.clusters.nodePools.list",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}/nodePools",
            )
            .with_fields(cluster())
            .with_description("Lists the node pools for a cluster."),
        ),
        operation(
            endpoint(
                "container.projects.zones.clusters.nodePools.delete",
                Method::DELETE,
                "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}/nodePools/{nodePoolId}",
            )
            .with_fields(cluster())
            .with_field(Field::path("nodePoolId"))
            .with_description("Deletes a node pool from a cluster."),
        ),
        operation(
            endpoint(
                "container.projects.zones.operations.get",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/operations/{operationId}",
            )
            .with_fields(zone())
            .with_field(Field::path("operationId"))
            .with_description("Gets the specified operation."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.operations.list",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/operations",
            )
            .with_fields(zone())
            .with_description("Lists all operations in a project in a specific zone or all zones."),
        ),
        Block::resource(
            endpoint(
                "container.projects.zones.getServerconfig",
                Method::GET,
                "v1/projects/{projectId}/zones/{zone}/serverconfig",
            )
            .with_fields(zone())
            .with_description("Returns configuration info about the Google Kubernetes Engine service."),
        ),
    ]
}
