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

//! Tracing spans for outbound HTTP requests.
//!
//! The attribute names follow the OpenTelemetry semantic conventions for
//! [HTTP spans], so the spans can be exported by any `tracing` layer that
//! understands them.
//!
//! [HTTP spans]: https://opentelemetry.io/docs/specs/semconv/http/http-spans/

use crate::error::Error;
use crate::request::HttpRequest;
use tracing::{Span, field};

pub mod keys {
    pub const OTEL_KIND: &str = "otel.kind";
    pub const OTEL_NAME: &str = "otel.name";
    pub const OTEL_STATUS_CODE: &str = "otel.status_code";
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    pub const SERVER_ADDRESS: &str = "server.address";
    pub const URL_FULL: &str = "url.full";
    pub const URL_TEMPLATE: &str = "url.template";
    pub const ERROR_TYPE: &str = "error.type";
    /// The Google Cloud service name, e.g. `sqladmin`.
    pub const GCP_CLIENT_SERVICE: &str = "gcp.client.service";
    /// The discovery method id, e.g. `sqladmin.instances.get`.
    pub const GCP_CLIENT_METHOD: &str = "gcp.client.method";
}

use keys::*;

/// Creates the span for one HTTP request.
///
/// The response attributes are recorded later, using
/// [record_http_response_attributes].
pub(crate) fn create_http_span(request: &HttpRequest) -> Span {
    let method = request.method().as_str();
    let service = request
        .endpoint_id()
        .split('.')
        .next()
        .unwrap_or_default();
    tracing::info_span!(
        "http_request",
        { OTEL_NAME } = format!("{method} {}", request.url_template()),
        { OTEL_KIND } = "Client",
        { HTTP_REQUEST_METHOD } = method,
        { SERVER_ADDRESS } = request.url().host_str().unwrap_or(""),
        { URL_FULL } = request.url().as_str(),
        { URL_TEMPLATE } = request.url_template(),
        { GCP_CLIENT_SERVICE } = service,
        { GCP_CLIENT_METHOD } = request.endpoint_id(),
        { OTEL_STATUS_CODE } = "UNSET",
        { HTTP_RESPONSE_STATUS_CODE } = field::Empty,
        { ERROR_TYPE } = field::Empty,
    )
}

/// Records the outcome of a request in `span`.
pub(crate) fn record_http_response_attributes(span: &Span, result: Result<u16, &Error>) {
    match result {
        Ok(status) => {
            span.record(OTEL_STATUS_CODE, "OK");
            span.record(HTTP_RESPONSE_STATUS_CODE, status as i64);
        }
        Err(err) => {
            span.record(OTEL_STATUS_CODE, "ERROR");
            if let Some(status) = err.http_status_code() {
                span.record(HTTP_RESPONSE_STATUS_CODE, status as i64);
            }
            span.record(ERROR_TYPE, error_type(err));
        }
    }
}

fn error_type(err: &Error) -> String {
    if let Some(status) = err.http_status_code() {
        return status.to_string();
    }
    let name = match err {
        e if e.is_timeout() => "CLIENT_TIMEOUT",
        e if e.is_io() => "CLIENT_CONNECTION_ERROR",
        e if e.is_deserialization() => "CLIENT_RESPONSE_DECODE_ERROR",
        e if e.is_serialization() => "CLIENT_REQUEST_ERROR",
        _ => "INTERNAL",
    };
    name.to_string()
}
