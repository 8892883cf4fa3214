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

use super::rpc::Status;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// A non-2xx response from a Google Cloud REST API.
///
/// The error keeps the full response: status, headers, and the raw payload.
/// When the payload is a Google error body it is also available, parsed, as
/// [details][ApiError::details].
#[derive(Clone, Debug)]
pub struct ApiError {
    status: StatusCode,
    headers: HeaderMap,
    payload: Bytes,
    details: Option<Status>,
}

impl ApiError {
    /// Creates a new instance, parsing `payload` if it is a Google error body.
    pub fn new(status: StatusCode, headers: HeaderMap, payload: Bytes) -> Self {
        let details = Status::from_http_payload(status.as_u16(), &payload).ok();
        Self {
            status,
            headers,
            payload,
            details,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The canonical reason phrase for [status][ApiError::status], or an
    /// empty string for unregistered codes.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or_default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response body, unmodified.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The parsed `{"error": {...}}` body, if the response included one.
    pub fn details(&self) -> Option<&Status> {
        self.details.as_ref()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.status.as_u16();
        let text = self.status_text();
        match &self.details {
            Some(d) => write!(
                f,
                "the service returned [{code} {text}] with code {} described as: {}",
                d.code, d.message
            ),
            None => match std::str::from_utf8(self.payload.as_ref()) {
                Ok(message) => write!(f, "the service returned [{code} {text}]: {message}"),
                Err(_) => write!(f, "the service returned [{code} {text}]: {:?}", self.payload),
            },
        }
    }
}
