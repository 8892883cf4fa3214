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

use crate::descriptor::{EndpointDescriptor, Field, FieldType, Location};
use crate::error::{Error, ValidationError};
use crate::path_template::PathTemplate;
use serde_json::{Map, Value};

/// The caller-supplied values for one call.
///
/// An invocation maps field names to JSON values. A field that is absent is
/// different from a field explicitly set to `null`: absent body fields are
/// omitted from the request, `null` body fields are sent as `null`.
///
/// # Example
/// ```
/// # use google_cloud_blocks_gax::invocation::Invocation;
/// let invocation = Invocation::new()
///     .set("instance", "my-instance")
///     .set("requestBody", serde_json::json!({"settings": {"tier": "db-f1-micro"}}));
/// assert_eq!(invocation.get("instance"), Some(&serde_json::json!("my-instance")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Invocation(Map<String, Value>);

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field, replacing any previous value.
    pub fn set<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Creates an invocation from a JSON object.
    ///
    /// Fails with a validation error if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            v => Err(Error::validation(ValidationError::TypeMismatch {
                field: String::new(),
                expected: FieldType::Object,
                got: json_type(&v),
            })),
        }
    }

    /// Checks the invocation against `endpoint`.
    ///
    /// Required fields must be present and not `null`. A [Location::Project]
    /// field is satisfied by `project_id` when it is configured. Path values
    /// must be strings or numbers, in both modes. With `strict`, every other
    /// present value must match its declared [FieldType].
    pub fn validate(
        &self,
        endpoint: &EndpointDescriptor,
        project_id: Option<&str>,
        strict: bool,
    ) -> Result<(), ValidationError> {
        let template = PathTemplate::parse(endpoint.path())?;
        for name in template.variables() {
            let is_path = endpoint
                .field(name)
                .is_some_and(|f| matches!(f.location(), Location::Path | Location::Project));
            if !is_path {
                return Err(ValidationError::UnknownPlaceholder(name.to_string()));
            }
        }
        for field in endpoint.fields() {
            self.validate_field(field, project_id, strict)?;
        }
        Ok(())
    }

    fn validate_field(
        &self,
        field: &Field,
        project_id: Option<&str>,
        strict: bool,
    ) -> Result<(), ValidationError> {
        let configured = field.location() == Location::Project && project_id.is_some();
        if configured {
            return Ok(());
        }
        let value = match self.get(field.name()) {
            None | Some(Value::Null) if field.location() == Location::Project => {
                return Err(ValidationError::MissingProject(field.name().to_string()));
            }
            None | Some(Value::Null) if field.is_required() => {
                return Err(ValidationError::MissingField(field.name().to_string()));
            }
            None | Some(Value::Null) => return Ok(()),
            Some(v) => v,
        };
        let in_path = matches!(field.location(), Location::Path | Location::Project);
        if in_path && !matches!(value, Value::String(_) | Value::Number(_)) {
            return Err(ValidationError::InvalidPathValue(field.name().to_string()));
        }
        // Path values are formatted into the URL, numbers are valid strings.
        let path_number = in_path && value.is_number();
        if strict && !path_number && !type_matches(field.field_type(), value) {
            return Err(ValidationError::TypeMismatch {
                field: field.name().to_string(),
                expected: field.field_type(),
                got: json_type(value),
            });
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for Invocation {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for Invocation
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Google APIs encode 64-bit integers as strings, numeric strings are valid
/// numbers.
fn type_matches(field_type: FieldType, value: &Value) -> bool {
    match (field_type, value) {
        (FieldType::String, Value::String(_)) => true,
        (FieldType::Number, Value::Number(_)) => true,
        (FieldType::Number, Value::String(s)) => s.trim().parse::<f64>().is_ok(),
        (FieldType::Boolean, Value::Bool(_)) => true,
        (FieldType::Object, Value::Object(_)) => true,
        (FieldType::Array, Value::Array(_)) => true,
        _ => false,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;
    use test_case::test_case;

    fn patch() -> EndpointDescriptor {
        EndpointDescriptor::new(
            "container.projects.locations.clusters.nodePools.setSize",
            Method::POST,
            "https://container.googleapis.com/",
            "v1/{+name}:setSize",
        )
        .with_field(Field::path("name"))
        .with_field(Field::body("nodeCount", FieldType::Number).required())
        .with_field(Field::body("projectId", FieldType::String))
        .with_field(Field::query("dryRun", FieldType::Boolean))
    }

    fn list() -> EndpointDescriptor {
        EndpointDescriptor::new(
            "sqladmin.instances.list",
            Method::GET,
            "https://sqladmin.googleapis.com/",
            "v1/projects/{project}/instances",
        )
        .with_field(Field::project("project"))
        .with_field(Field::query("maxResults", FieldType::Number))
    }

    #[test]
    fn builders() -> anyhow::Result<()> {
        let invocation = Invocation::new().set("a", 1).set("b", "x").set("a", 2);
        assert_eq!(invocation.get("a"), Some(&json!(2)));
        assert!(invocation.contains("b"));
        assert!(!invocation.contains("c"));
        assert_eq!(invocation.iter().count(), 2);

        let from_iter = [("a", json!(2)), ("b", json!("x"))]
            .into_iter()
            .collect::<Invocation>();
        assert_eq!(from_iter, invocation);

        let from_value = Invocation::from_value(json!({"a": 2, "b": "x"}))?;
        assert_eq!(from_value, invocation);

        let err = Invocation::from_value(json!([1, 2])).unwrap_err();
        assert!(err.is_validation(), "{err:?}");
        Ok(())
    }

    #[test]
    fn valid() -> anyhow::Result<()> {
        let invocation = Invocation::new()
            .set("name", "projects/p/locations/l/clusters/c/nodePools/np")
            .set("nodeCount", 3);
        invocation.validate(&patch(), None, false)?;
        invocation.validate(&patch(), None, true)?;
        Ok(())
    }

    #[test_case(Invocation::new().set("nodeCount", 3), "name")]
    #[test_case(Invocation::new().set("name", "n"), "nodeCount")]
    #[test_case(Invocation::new().set("name", "n").set("nodeCount", json!(null)), "nodeCount")]
    fn missing_field(invocation: Invocation, want: &str) {
        let got = invocation.validate(&patch(), None, false);
        assert!(
            matches!(&got, Err(ValidationError::MissingField(f)) if f == want),
            "{got:?}"
        );
    }

    #[test]
    fn project_from_configuration() -> anyhow::Result<()> {
        Invocation::new().validate(&list(), Some("my-project"), true)?;
        Invocation::new()
            .set("project", "caller-project")
            .validate(&list(), None, true)?;
        let got = Invocation::new().validate(&list(), None, false);
        assert!(
            matches!(&got, Err(ValidationError::MissingProject(f)) if f == "project"),
            "{got:?}"
        );
        Ok(())
    }

    #[test_case(json!(true))]
    #[test_case(json!({"a": 1}))]
    #[test_case(json!(["a"]))]
    fn invalid_path_value(value: Value) {
        let invocation = Invocation::new().set("name", value).set("nodeCount", 3);
        let got = invocation.validate(&patch(), None, false);
        assert!(
            matches!(&got, Err(ValidationError::InvalidPathValue(f)) if f == "name"),
            "{got:?}"
        );
    }

    #[test_case(true)]
    #[test_case(false)]
    fn numeric_path_value(strict: bool) -> anyhow::Result<()> {
        let invocation = Invocation::new().set("name", 123).set("nodeCount", 3);
        invocation.validate(&patch(), None, strict)?;
        let invocation = Invocation::new().set("project", 123456);
        invocation.validate(&list(), None, strict)?;
        Ok(())
    }

    #[test_case("nodeCount", json!("3"), true)]
    #[test_case("nodeCount", json!(" 3.5 "), true)]
    #[test_case("nodeCount", json!("three"), false)]
    #[test_case("nodeCount", json!(true), false)]
    #[test_case("dryRun", json!(true), true)]
    #[test_case("dryRun", json!("true"), false)]
    #[test_case("projectId", json!("p"), true)]
    #[test_case("projectId", json!(42), false)]
    fn strict_types(field: &str, value: Value, ok: bool) {
        let invocation = Invocation::new()
            .set("name", "n")
            .set("nodeCount", 3)
            .set(field, value);
        let got = invocation.validate(&patch(), None, true);
        assert_eq!(got.is_ok(), ok, "{got:?}");
        if let Err(e) = got {
            assert!(
                matches!(&e, ValidationError::TypeMismatch { field: f, .. } if f == field),
                "{e:?}"
            );
        }
        let relaxed = invocation.validate(&patch(), None, false);
        assert!(relaxed.is_ok(), "{relaxed:?}");
    }

    #[test]
    fn unknown_placeholder() {
        let endpoint = EndpointDescriptor::new(
            "test.get",
            Method::GET,
            "https://test.googleapis.com/",
            "v1/{name}/{other}",
        )
        .with_field(Field::path("name"))
        .with_field(Field::query("other", FieldType::String));
        let invocation = Invocation::new().set("name", "n").set("other", "o");
        let got = invocation.validate(&endpoint, None, false);
        assert!(
            matches!(&got, Err(ValidationError::UnknownPlaceholder(f)) if f == "other"),
            "{got:?}"
        );
    }

    #[test]
    fn malformed_template() {
        let endpoint =
            EndpointDescriptor::new("test.get", Method::GET, "https://test/", "v1/{name");
        let got = Invocation::new().validate(&endpoint, None, false);
        assert!(
            matches!(&got, Err(ValidationError::MalformedTemplate(_))),
            "{got:?}"
        );
    }
}
