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

//! Endpoint descriptors: the data describing one REST method.
//!
//! A descriptor names the HTTP method, the URL template, the OAuth scopes,
//! and how each caller-supplied field maps into the request. Descriptors are
//! immutable once built.
//!
//! # Example
//! ```
//! # use google_cloud_blocks_gax::descriptor::*;
//! let endpoint = EndpointDescriptor::new(
//!     "sqladmin.instances.get",
//!     http::Method::GET,
//!     "https://sqladmin.googleapis.com/",
//!     "v1/projects/{project}/instances/{instance}",
//! )
//! .with_field(Field::project("project"))
//! .with_field(Field::path("instance").with_description("Database instance ID."));
//! assert_eq!(endpoint.body_mode(), BodyMode::Empty);
//! assert_eq!(
//!     endpoint.url_template(),
//!     "https://sqladmin.googleapis.com/v1/projects/{project}/instances/{instance}"
//! );
//! ```

use auth::constants::CLOUD_PLATFORM_SCOPE;
use http::Method;

/// The name of the field holding an opaque request body.
pub const REQUEST_BODY_FIELD: &str = "requestBody";

/// The declared type of a field.
///
/// Types are advisory unless the dispatcher is configured with
/// [with_strict_types][crate::dispatcher::DispatcherBuilder::with_strict_types].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the value of a field goes in the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Substituted into the path template.
    Path,
    /// Substituted into the path template, using the configured project id.
    Project,
    /// Added to the query string.
    Query,
    /// Added to the JSON request body.
    Body,
}

/// How the request body is assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyMode {
    /// The request has no body.
    Empty,
    /// The `requestBody` field is sent verbatim.
    RequestBody,
    /// Each [Location::Body] field supplied by the caller becomes a property
    /// of the JSON body.
    Fields,
}

/// One caller-supplied input of an endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    field_type: FieldType,
    location: Location,
    required: bool,
    description: String,
}

impl Field {
    /// Creates an optional field.
    pub fn new<T: Into<String>>(name: T, field_type: FieldType, location: Location) -> Self {
        Self {
            name: name.into(),
            field_type,
            location,
            required: false,
            description: String::new(),
        }
    }

    /// A required string field substituted into the path.
    pub fn path<T: Into<String>>(name: T) -> Self {
        Self::new(name, FieldType::String, Location::Path).required()
    }

    /// A required string field filled from the configured project id.
    pub fn project<T: Into<String>>(name: T) -> Self {
        Self::new(name, FieldType::String, Location::Project).required()
    }

    /// An optional query parameter.
    pub fn query<T: Into<String>>(name: T, field_type: FieldType) -> Self {
        Self::new(name, field_type, Location::Query)
    }

    /// An optional property of the request body.
    pub fn body<T: Into<String>>(name: T, field_type: FieldType) -> Self {
        Self::new(name, field_type, Location::Body)
    }

    /// The required, opaque, request body.
    pub fn request_body() -> Self {
        Self::new(REQUEST_BODY_FIELD, FieldType::Object, Location::Body).required()
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the field description.
    pub fn with_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = v.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn is_request_body(&self) -> bool {
        self.location == Location::Body && self.name == REQUEST_BODY_FIELD
    }
}

/// Describes one REST method.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointDescriptor {
    id: String,
    method: Method,
    base_url: String,
    path: String,
    scopes: Vec<String>,
    fields: Vec<Field>,
    description: String,
}

impl EndpointDescriptor {
    /// Creates a descriptor with no fields and the `cloud-platform` scope.
    ///
    /// # Parameters
    /// * `id` - the discovery method id, e.g. `container.projects.locations.clusters.get`.
    /// * `method` - the HTTP method.
    /// * `base_url` - the service root, e.g. `https://container.googleapis.com/`.
    /// * `path` - the path template, relative to `base_url`.
    pub fn new<I, B, P>(id: I, method: Method, base_url: B, path: P) -> Self
    where
        I: Into<String>,
        B: Into<String>,
        P: Into<String>,
    {
        Self {
            id: id.into(),
            method,
            base_url: base_url.into(),
            path: path.into(),
            scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            fields: Vec::new(),
            description: String::new(),
        }
    }

    /// Replaces the OAuth scopes.
    pub fn with_scopes<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<String>,
    {
        self.scopes = v.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Adds a field, replacing any existing field with the same name.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    /// Adds many fields.
    pub fn with_fields<T>(self, v: T) -> Self
    where
        T: IntoIterator<Item = Field>,
    {
        v.into_iter().fold(self, |d, f| d.with_field(f))
    }

    pub fn with_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = v.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The full URL template, joining the base URL and the path.
    pub fn url_template(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// How the request body is assembled.
    ///
    /// `GET` and `DELETE` requests never have a body.
    pub fn body_mode(&self) -> BodyMode {
        if self.method == Method::GET || self.method == Method::DELETE {
            return BodyMode::Empty;
        }
        if self.fields.iter().any(Field::is_request_body) {
            return BodyMode::RequestBody;
        }
        if self.fields.iter().any(|f| f.location == Location::Body) {
            return BodyMode::Fields;
        }
        BodyMode::Empty
    }

    /// Fields in `location`, in declaration order.
    pub fn fields_in(&self, location: Location) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.location == location)
    }
}
