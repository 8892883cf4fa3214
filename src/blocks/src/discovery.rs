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

//! Loads blocks from [Google API discovery documents].
//!
//! [Google API discovery documents]: https://developers.google.com/discovery/v1/reference/apis

use crate::{Block, Catalog, OutputKind};
use gax::Result;
use gax::descriptor::{EndpointDescriptor, Field, FieldType, Location};
use gax::error::Error;
use lro::Dialect;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const OPERATION_SCHEMA: &str = "Operation";
const EMPTY_SCHEMA: &str = "Empty";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    version: String,
    root_url: String,
    #[serde(default)]
    service_path: String,
    #[serde(default)]
    auth: Auth,
    #[serde(default)]
    methods: BTreeMap<String, Method>,
    #[serde(default)]
    resources: BTreeMap<String, Resource>,
}

#[derive(Debug, Default, Deserialize)]
struct Auth {
    #[serde(default)]
    oauth2: OAuth2,
}

#[derive(Debug, Default, Deserialize)]
struct OAuth2 {
    #[serde(default)]
    scopes: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(default)]
    methods: BTreeMap<String, Method>,
    #[serde(default)]
    resources: BTreeMap<String, Resource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Method {
    id: String,
    http_method: String,
    path: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: BTreeMap<String, Parameter>,
    #[serde(default)]
    parameter_order: Vec<String>,
    request: Option<SchemaRef>,
    response: Option<SchemaRef>,
    #[serde(default)]
    scopes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Parameter {
    #[serde(rename = "type", default)]
    kind: String,
    location: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    repeated: bool,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SchemaRef {
    #[serde(rename = "$ref")]
    reference: String,
}

impl Catalog {
    /// Creates the blocks for all the methods in a discovery document.
    ///
    /// Path parameters named `project` or `projectId` are filled from the
    /// configured project id. Methods returning an `Operation` are
    /// long-running, and poll the service's `operations.get` method when the
    /// document includes it.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_blocks::Catalog;
    /// let document = serde_json::json!({
    ///     "name": "sqladmin",
    ///     "version": "v1",
    ///     "rootUrl": "https://sqladmin.googleapis.com/",
    ///     "servicePath": "",
    ///     "resources": {"flags": {"methods": {"list": {
    ///         "id": "sqladmin.flags.list",
    ///         "httpMethod": "GET",
    ///         "path": "v1/flags",
    ///         "response": {"$ref": "FlagsListResponse"}
    ///     }}}}
    /// });
    /// let catalog = Catalog::from_discovery_document(&document)?;
    /// assert!(catalog.get("sqladmin.flags.list").is_some());
    /// # Ok::<(), google_cloud_blocks::Error>(())
    /// ```
    pub fn from_discovery_document(document: &Value) -> Result<Catalog> {
        let document = Document::deserialize(document).map_err(Error::deser)?;
        let base_url = format!("{}{}", document.root_url, document.service_path);
        let default_scopes = document.auth.oauth2.scopes.keys().cloned().collect::<Vec<_>>();
        let dialect = dialect(&document.name);

        let mut methods = Vec::new();
        collect_methods(&document.methods, &document.resources, &mut methods);
        let descriptors = methods
            .into_iter()
            .map(|m| {
                let kind = output(m, dialect);
                descriptor(m, &base_url, &default_scopes).map(|d| (d, kind))
            })
            .collect::<Result<Vec<_>>>()?;

        let poll = poll_method(&document.name, &document.version, &descriptors)
            .map(|(get, name_field)| (get.clone(), name_field));
        let catalog = descriptors
            .into_iter()
            .map(|(descriptor, output)| match (output, &poll) {
                (OutputKind::Operation(dialect), Some((get, name_field))) => {
                    Block::operation(descriptor, dialect).with_poll(get.clone(), *name_field)
                }
                (OutputKind::Operation(dialect), None) => Block::operation(descriptor, dialect),
                (OutputKind::Empty, _) => Block::empty(descriptor),
                _ => Block::resource(descriptor),
            })
            .collect::<Catalog>();
        tracing::debug!(
            service = document.name.as_str(),
            version = document.version.as_str(),
            blocks = catalog.len(),
            "loaded discovery document"
        );
        Ok(catalog)
    }
}

fn collect_methods<'a>(
    methods: &'a BTreeMap<String, Method>,
    resources: &'a BTreeMap<String, Resource>,
    output: &mut Vec<&'a Method>,
) {
    output.extend(methods.values());
    for resource in resources.values() {
        collect_methods(&resource.methods, &resource.resources, output);
    }
}

fn dialect(service: &str) -> Dialect {
    match service {
        "container" => Dialect::Container,
        "sqladmin" => Dialect::Sql,
        _ => Dialect::Longrunning,
    }
}

fn output(method: &Method, dialect: Dialect) -> OutputKind {
    match method.response.as_ref().map(|r| r.reference.as_str()) {
        Some(OPERATION_SCHEMA) => OutputKind::Operation(dialect),
        None | Some(EMPTY_SCHEMA) => OutputKind::Empty,
        Some(_) => OutputKind::Resource,
    }
}

fn descriptor(method: &Method, base_url: &str, default_scopes: &[String]) -> Result<EndpointDescriptor> {
    let http_method = http::Method::from_bytes(method.http_method.as_bytes())
        .map_err(|e| Error::deser(format!("invalid httpMethod for `{}`: {e}", method.id)))?;
    let mut descriptor = EndpointDescriptor::new(&method.id, http_method, base_url, &method.path)
        .with_description(&method.description);
    let scopes = if method.scopes.is_empty() {
        default_scopes
    } else {
        &method.scopes
    };
    if !scopes.is_empty() {
        descriptor = descriptor.with_scopes(scopes);
    }

    let ordered = method
        .parameter_order
        .iter()
        .filter_map(|name| method.parameters.get_key_value(name))
        .chain(
            method
                .parameters
                .iter()
                .filter(|(name, _)| !method.parameter_order.contains(*name)),
        );
    for (name, parameter) in ordered {
        descriptor = descriptor.with_field(field(&method.id, name, parameter)?);
    }
    if method.request.is_some() {
        descriptor = descriptor.with_field(Field::request_body());
    }
    Ok(descriptor)
}

fn field(method_id: &str, name: &str, parameter: &Parameter) -> Result<Field> {
    let field = match parameter.location.as_str() {
        "path" if name == "project" || name == "projectId" => Field::project(name),
        "path" => Field::new(name, field_type(parameter), Location::Path).required(),
        "query" if parameter.required => {
            Field::new(name, field_type(parameter), Location::Query).required()
        }
        "query" => Field::new(name, field_type(parameter), Location::Query),
        location => {
            return Err(Error::deser(format!(
                "unknown location `{location}` for parameter `{name}` of `{method_id}`"
            )));
        }
    };
    Ok(field.with_description(&parameter.description))
}

fn field_type(parameter: &Parameter) -> FieldType {
    if parameter.repeated {
        return FieldType::Array;
    }
    match parameter.kind.as_str() {
        "integer" | "number" => FieldType::Number,
        "boolean" => FieldType::Boolean,
        "object" => FieldType::Object,
        "array" => FieldType::Array,
        _ => FieldType::String,
    }
}

/// Finds the method used to poll the operations of a service.
fn poll_method<'a>(
    service: &str,
    version: &str,
    descriptors: &'a [(EndpointDescriptor, OutputKind)],
) -> Option<(&'a EndpointDescriptor, &'static str)> {
    let (id, name_field) = match (service, version) {
        ("cloudbuild", "v2") => ("cloudbuild.projects.locations.operations.get", "name"),
        ("cloudbuild", _) => ("cloudbuild.operations.get", "name"),
        ("container", _) => ("container.projects.locations.operations.get", "name"),
        ("sqladmin", _) => ("sqladmin.operations.get", "operation"),
        _ => {
            return descriptors
                .iter()
                .map(|(d, _)| d)
                .find(|d| {
                    d.id().ends_with(".operations.get")
                        && d.field("name").is_some_and(|f| f.location() == Location::Path)
                })
                .map(|d| (d, "name"));
        }
    };
    descriptors
        .iter()
        .map(|(d, _)| d)
        .find(|d| d.id() == id)
        .map(|d| (d, name_field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::constants::{CLOUD_PLATFORM_SCOPE, SQLSERVICE_ADMIN_SCOPE};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    /// The parts of a block that discovery documents determine.
    #[derive(Debug, PartialEq)]
    struct Shape {
        method: http::Method,
        url_template: String,
        scopes: Vec<String>,
        fields: Vec<(String, FieldType, Location, bool)>,
        output: OutputKind,
        poll: Option<String>,
    }

    fn shape(block: &Block) -> Shape {
        let descriptor = block.descriptor();
        let mut fields = descriptor
            .fields()
            .iter()
            .map(|f| {
                (
                    f.name().to_string(),
                    f.field_type(),
                    f.location(),
                    f.is_required(),
                )
            })
            .collect::<Vec<_>>();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Shape {
            method: descriptor.method().clone(),
            url_template: descriptor.url_template(),
            scopes: descriptor.scopes().to_vec(),
            fields,
            output: block.output().clone(),
            poll: block.poll_descriptor().map(|d| d.url_template()),
        }
    }

    fn scopes() -> Value {
        json!({"oauth2": {"scopes": {
            CLOUD_PLATFORM_SCOPE: {"description": "See, edit, configure, and delete your Google Cloud data"}
        }}})
    }

    fn cloudbuild_v2() -> Value {
        json!({
            "name": "cloudbuild",
            "version": "v2",
            "rootUrl": "https://cloudbuild.googleapis.com/",
            "servicePath": "",
            "auth": scopes(),
            "resources": {"projects": {"resources": {"locations": {
                "methods": {
                    "get": {
                        "id": "cloudbuild.projects.locations.get",
                        "httpMethod": "GET",
                        "path": "v2/{+name}",
                        "parameters": {"name": {
                            "type": "string", "location": "path", "required": true,
                            "description": "Resource name for the location."
                        }},
                        "parameterOrder": ["name"],
                        "response": {"$ref": "Location"},
                        "scopes": [CLOUD_PLATFORM_SCOPE]
                    }
                },
                "resources": {
                    "connections": {"methods": {
                        "create": {
                            "id": "cloudbuild.projects.locations.connections.create",
                            "httpMethod": "POST",
                            "path": "v2/{+parent}/connections",
                            "parameters": {
                                "parent": {"type": "string", "location": "path", "required": true},
                                "connectionId": {"type": "string", "location": "query"}
                            },
                            "parameterOrder": ["parent"],
                            "request": {"$ref": "Connection"},
                            "response": {"$ref": "Operation"},
                            "scopes": [CLOUD_PLATFORM_SCOPE]
                        }
                    }},
                    "operations": {"methods": {
                        "get": {
                            "id": "cloudbuild.projects.locations.operations.get",
                            "httpMethod": "GET",
                            "path": "v2/{+name}",
                            "parameters": {"name": {"type": "string", "location": "path", "required": true}},
                            "parameterOrder": ["name"],
                            "response": {"$ref": "Operation"},
                            "scopes": [CLOUD_PLATFORM_SCOPE]
                        },
                        "cancel": {
                            "id": "cloudbuild.projects.locations.operations.cancel",
                            "httpMethod": "POST",
                            "path": "v2/{+name}:cancel",
                            "parameters": {"name": {"type": "string", "location": "path", "required": true}},
                            "parameterOrder": ["name"],
                            "request": {"$ref": "CancelOperationRequest"},
                            "response": {"$ref": "Empty"},
                            "scopes": [CLOUD_PLATFORM_SCOPE]
                        }
                    }}
                }
            }}}}
        })
    }

    fn sqladmin() -> Value {
        json!({
            "name": "sqladmin",
            "version": "v1",
            "rootUrl": "https://sqladmin.googleapis.com/",
            "servicePath": "",
            "auth": {"oauth2": {"scopes": {
                CLOUD_PLATFORM_SCOPE: {"description": "cloud platform"},
                SQLSERVICE_ADMIN_SCOPE: {"description": "sql admin"}
            }}},
            "resources": {
                "instances": {"methods": {
                    "insert": {
                        "id": "sqladmin.instances.insert",
                        "httpMethod": "POST",
                        "path": "v1/projects/{project}/instances",
                        "parameters": {"project": {"type": "string", "location": "path", "required": true}},
                        "parameterOrder": ["project"],
                        "request": {"$ref": "DatabaseInstance"},
                        "response": {"$ref": "Operation"}
                    },
                    "list": {
                        "id": "sqladmin.instances.list",
                        "httpMethod": "GET",
                        "path": "v1/projects/{project}/instances",
                        "parameters": {
                            "project": {"type": "string", "location": "path", "required": true},
                            "filter": {"type": "string", "location": "query"},
                            "maxResults": {"type": "integer", "format": "uint32", "location": "query"},
                            "pageToken": {"type": "string", "location": "query"}
                        },
                        "parameterOrder": ["project"],
                        "response": {"$ref": "InstancesListResponse"}
                    }
                }},
                "operations": {"methods": {
                    "get": {
                        "id": "sqladmin.operations.get",
                        "httpMethod": "GET",
                        "path": "v1/projects/{project}/operations/{operation}",
                        "parameters": {
                            "project": {"type": "string", "location": "path", "required": true},
                            "operation": {"type": "string", "location": "path", "required": true}
                        },
                        "parameterOrder": ["project", "operation"],
                        "response": {"$ref": "Operation"}
                    }
                }},
                "flags": {"methods": {
                    "list": {
                        "id": "sqladmin.flags.list",
                        "httpMethod": "GET",
                        "path": "v1/flags",
                        "parameters": {"databaseVersion": {"type": "string", "location": "query"}},
                        "response": {"$ref": "FlagsListResponse"}
                    }
                }}
            }
        })
    }

    fn container() -> Value {
        json!({
            "name": "container",
            "version": "v1",
            "rootUrl": "https://container.googleapis.com/",
            "servicePath": "",
            "auth": scopes(),
            "resources": {"projects": {"resources": {
                "zones": {"resources": {"clusters": {"methods": {
                    "get": {
                        "id": "container.projects.zones.clusters.get",
                        "httpMethod": "GET",
                        "path": "v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}",
                        "parameters": {
                            "projectId": {"type": "string", "location": "path", "required": true},
                            "zone": {"type": "string", "location": "path", "required": true},
                            "clusterId": {"type": "string", "location": "path", "required": true}
                        },
                        "parameterOrder": ["projectId", "zone", "clusterId"],
                        "response": {"$ref": "Cluster"}
                    }
                }}}},
                "locations": {
                    "resources": {
                        "clusters": {"methods": {
                            "create": {
                                "id": "container.projects.locations.clusters.create",
                                "httpMethod": "POST",
                                "path": "v1/{+parent}/clusters",
                                "parameters": {"parent": {"type": "string", "location": "path", "required": true}},
                                "parameterOrder": ["parent"],
                                "request": {"$ref": "CreateClusterRequest"},
                                "response": {"$ref": "Operation"}
                            }
                        }},
                        "operations": {"methods": {
                            "get": {
                                "id": "container.projects.locations.operations.get",
                                "httpMethod": "GET",
                                "path": "v1/{+name}",
                                "parameters": {"name": {"type": "string", "location": "path", "required": true}},
                                "parameterOrder": ["name"],
                                "response": {"$ref": "Operation"}
                            }
                        }}
                    }
                }
            }}}
        })
    }

    #[test_case(cloudbuild_v2(), 4)]
    #[test_case(sqladmin(), 4)]
    #[test_case(container(), 3)]
    fn same_shape_as_builtin(document: Value, count: usize) -> TestResult {
        let catalog = Catalog::from_discovery_document(&document)?;
        assert_eq!(catalog.len(), count);
        for block in &catalog {
            let builtin = Catalog::builtin().get(block.id());
            assert!(builtin.is_some(), "{}", block.id());
            assert_eq!(shape(block), shape(builtin.unwrap()), "{}", block.id());
        }
        Ok(())
    }

    #[test]
    fn parameters() -> TestResult {
        let catalog = Catalog::from_discovery_document(&sqladmin())?;
        let block = catalog.get("sqladmin.instances.list").unwrap();
        let descriptor = block.descriptor();
        let names = descriptor.fields().iter().map(|f| f.name()).collect::<Vec<_>>();
        // `parameterOrder` first, then the remaining parameters by name.
        assert_eq!(names, vec!["project", "filter", "maxResults", "pageToken"]);
        let project = descriptor.field("project").unwrap();
        assert_eq!(project.location(), Location::Project);
        assert!(project.is_required());
        let max = descriptor.field("maxResults").unwrap();
        assert_eq!(max.field_type(), FieldType::Number);
        assert!(!max.is_required());
        Ok(())
    }

    #[test]
    fn descriptions() -> TestResult {
        let catalog = Catalog::from_discovery_document(&cloudbuild_v2())?;
        let block = catalog.get("cloudbuild.projects.locations.get").unwrap();
        assert_eq!(
            block.descriptor().field("name").map(|f| f.description()),
            Some("Resource name for the location.")
        );
        Ok(())
    }

    #[test]
    fn repeated_and_required_query() -> TestResult {
        let document = json!({
            "name": "test",
            "version": "v1",
            "rootUrl": "https://test.googleapis.com/",
            "servicePath": "api/",
            "methods": {"list": {
                "id": "test.list",
                "httpMethod": "GET",
                "path": "v1/things",
                "parameters": {
                    "ids": {"type": "string", "location": "query", "repeated": true},
                    "mode": {"type": "boolean", "location": "query", "required": true}
                }
            }}
        });
        let catalog = Catalog::from_discovery_document(&document)?;
        let block = catalog.get("test.list").unwrap();
        let descriptor = block.descriptor();
        assert_eq!(descriptor.url_template(), "https://test.googleapis.com/api/v1/things");
        assert_eq!(descriptor.scopes(), &[CLOUD_PLATFORM_SCOPE.to_string()]);
        assert_eq!(descriptor.field("ids").map(|f| f.field_type()), Some(FieldType::Array));
        assert_eq!(descriptor.field("mode").map(|f| f.is_required()), Some(true));
        assert_eq!(block.output(), &OutputKind::Empty);
        Ok(())
    }

    #[test]
    fn generic_poll_method() -> TestResult {
        let document = json!({
            "name": "test",
            "version": "v1",
            "rootUrl": "https://test.googleapis.com/",
            "resources": {
                "things": {"methods": {"create": {
                    "id": "test.things.create",
                    "httpMethod": "POST",
                    "path": "v1/things",
                    "request": {"$ref": "Thing"},
                    "response": {"$ref": "Operation"}
                }}},
                "operations": {"methods": {"get": {
                    "id": "test.operations.get",
                    "httpMethod": "GET",
                    "path": "v1/{+name}",
                    "parameters": {"name": {"type": "string", "location": "path", "required": true}},
                    "response": {"$ref": "Operation"}
                }}}
            }
        });
        let catalog = Catalog::from_discovery_document(&document)?;
        let block = catalog.get("test.things.create").unwrap();
        assert_eq!(block.output(), &OutputKind::Operation(Dialect::Longrunning));
        assert_eq!(
            block.poll_descriptor().map(|d| d.id()),
            Some("test.operations.get")
        );
        Ok(())
    }

    #[test]
    fn missing_poll_method() -> TestResult {
        let document = json!({
            "name": "sqladmin",
            "version": "v1",
            "rootUrl": "https://sqladmin.googleapis.com/",
            "methods": {"insert": {
                "id": "sqladmin.instances.insert",
                "httpMethod": "POST",
                "path": "v1/projects/{project}/instances",
                "parameters": {"project": {"type": "string", "location": "path", "required": true}},
                "request": {"$ref": "DatabaseInstance"},
                "response": {"$ref": "Operation"}
            }}
        });
        let catalog = Catalog::from_discovery_document(&document)?;
        let block = catalog.get("sqladmin.instances.insert").unwrap();
        assert_eq!(block.output(), &OutputKind::Operation(Dialect::Sql));
        assert!(block.poll_descriptor().is_none());
        Ok(())
    }

    #[test_case(json!("not a document"))]
    #[test_case(json!({"name": "test", "version": "v1"}))]
    #[test_case(json!({"name": "test", "version": "v1", "rootUrl": "https://test.googleapis.com/", "methods": {
        "get": {"id": "test.get", "httpMethod": "GET", "path": "v1/{name}",
                "parameters": {"name": {"type": "string", "location": "header"}}}
    }}))]
    #[test_case(json!({"name": "test", "version": "v1", "rootUrl": "https://test.googleapis.com/", "methods": {
        "get": {"id": "test.get", "httpMethod": "BAD METHOD", "path": "v1/things"}
    }}))]
    fn malformed(document: Value) {
        let got = Catalog::from_discovery_document(&document);
        assert!(matches!(&got, Err(e) if e.is_deserialization()), "{got:?}");
    }
}
