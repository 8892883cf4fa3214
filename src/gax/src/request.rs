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

use crate::Result;
use crate::descriptor::{BodyMode, EndpointDescriptor, Location, REQUEST_BODY_FIELD};
use crate::error::{CredentialsError, Error, ValidationError};
use crate::invocation::Invocation;
use crate::options::ClientConfig;
use crate::path_template::PathTemplate;
use crate::query_parameter;
use auth::token::Token;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::{HeaderMap, Method};
use serde_json::{Map, Value};
use url::Url;

const USER_AGENT_VALUE: &str = concat!("google-cloud-blocks/", env!("CARGO_PKG_VERSION"));
const USER_PROJECT: HeaderName = HeaderName::from_static("x-goog-user-project");

/// A fully formed HTTP request, ready to send.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Value>,
    pub(crate) endpoint_id: String,
    pub(crate) url_template: String,
}

impl HttpRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request headers. The `Authorization` header is marked as sensitive.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The id of the endpoint used to build this request.
    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// The URL template of the endpoint used to build this request.
    pub fn url_template(&self) -> &str {
        &self.url_template
    }
}

/// Builds the request for `endpoint`.
///
/// The invocation is validated first, no request is built for an invalid
/// invocation.
pub(crate) fn build_request(
    config: &ClientConfig,
    endpoint: &EndpointDescriptor,
    invocation: &Invocation,
    token: &Token,
) -> Result<HttpRequest> {
    let project_id = config.project_id();
    invocation
        .validate(endpoint, project_id, config.strict_types)
        .map_err(Error::validation)?;

    let url = build_url(config, endpoint, invocation).map_err(Error::validation)?;
    let headers = build_headers(config, token)?;
    let body = build_body(endpoint, invocation);
    Ok(HttpRequest {
        method: endpoint.method().clone(),
        url,
        headers,
        body,
        endpoint_id: endpoint.id().to_string(),
        url_template: endpoint.url_template(),
    })
}

fn build_url(
    config: &ClientConfig,
    endpoint: &EndpointDescriptor,
    invocation: &Invocation,
) -> std::result::Result<Url, ValidationError> {
    let path = PathTemplate::parse(endpoint.path())?.expand(|name| {
        path_value(config, endpoint, invocation, name)
    })?;
    let base_url = effective_base_url(config, endpoint.base_url());
    let full = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&full).map_err(|_| ValidationError::InvalidUrl(full.clone()))?;
    for field in endpoint.fields_in(Location::Query) {
        if let Some(value) = invocation.get(field.name()) {
            query_parameter::add(&mut url, field.name(), value);
        }
    }
    Ok(url)
}

fn path_value(
    config: &ClientConfig,
    endpoint: &EndpointDescriptor,
    invocation: &Invocation,
    name: &str,
) -> std::result::Result<String, ValidationError> {
    let field = endpoint
        .field(name)
        .ok_or_else(|| ValidationError::UnknownPlaceholder(name.to_string()))?;
    let value = match (field.location(), config.project_id()) {
        (Location::Project, Some(project)) => return Ok(project.to_string()),
        (Location::Project, None) => invocation
            .get(name)
            .ok_or_else(|| ValidationError::MissingProject(name.to_string()))?,
        (Location::Path, _) => invocation
            .get(name)
            .ok_or_else(|| ValidationError::MissingField(name.to_string()))?,
        _ => return Err(ValidationError::UnknownPlaceholder(name.to_string())),
    };
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationError::InvalidPathValue(name.to_string())),
    }
}

/// Replaces the scheme and authority of `base_url` if its host has an
/// override.
fn effective_base_url(config: &ClientConfig, base_url: &str) -> String {
    let Ok(parsed) = Url::parse(base_url) else {
        return base_url.to_string();
    };
    let Some(replacement) = parsed
        .host_str()
        .and_then(|host| config.endpoint_overrides.get(host))
    else {
        return base_url.to_string();
    };
    format!("{}{}", replacement.trim_end_matches('/'), parsed.path())
}

fn build_headers(config: &ClientConfig, token: &Token) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut authorization =
        HeaderValue::from_str(&format!("{} {}", token.token_type, token.token))
            .map_err(|e| Error::authentication(CredentialsError::from_source(false, e)))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    if let Some(project) = config.quota_project_id() {
        let value = HeaderValue::from_str(project).map_err(Error::ser)?;
        headers.insert(USER_PROJECT, value);
    }
    Ok(headers)
}

fn build_body(endpoint: &EndpointDescriptor, invocation: &Invocation) -> Option<Value> {
    match endpoint.body_mode() {
        BodyMode::Empty => None,
        BodyMode::RequestBody => invocation.get(REQUEST_BODY_FIELD).cloned(),
        BodyMode::Fields => {
            let body = endpoint
                .fields_in(Location::Body)
                .filter_map(|f| {
                    invocation
                        .get(f.name())
                        .map(|v| (f.name().to_string(), v.clone()))
                })
                .collect::<Map<_, _>>();
            Some(Value::Object(body))
        }
    }
}
