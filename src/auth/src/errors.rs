// Copyright 2024 Google LLC
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

//! Errors created while exchanging credentials for access tokens.

use http::StatusCode;
use std::error::Error;
use std::sync::Arc;

/// Represents an error using [Credentials](crate::credentials::Credentials)
/// to obtain an access token.
///
/// The token exchange may fail because the token endpoint is unreachable,
/// rejects the signed assertion (invalid key, clock skew, disabled account),
/// or returns an unexpected response. This library never retries the
/// exchange. The error records whether a future attempt *might* succeed so
/// callers can implement their own retry policy.
#[derive(Clone, Debug)]
pub struct CredentialsError {
    is_transient: bool,
    source: CredentialsErrorImpl,
}

#[derive(Clone, Debug)]
enum CredentialsErrorImpl {
    SimpleMessage(String),
    Source(Arc<dyn Error + Send + Sync>),
}

impl CredentialsError {
    /// Creates a new `CredentialsError`.
    ///
    /// # Arguments
    /// * `is_transient` - if true, the operation may succeed in future attempts.
    /// * `source` - the underlying error that caused the failure.
    pub fn from_source<T: Error + Send + Sync + 'static>(is_transient: bool, source: T) -> Self {
        CredentialsError {
            is_transient,
            source: CredentialsErrorImpl::Source(Arc::new(source)),
        }
    }

    /// Creates a new `CredentialsError` from a message.
    ///
    /// Applications rarely need this function. It is useful when mocking
    /// credentials in tests.
    pub fn from_msg<T: Into<String>>(is_transient: bool, message: T) -> Self {
        CredentialsError {
            is_transient,
            source: CredentialsErrorImpl::SimpleMessage(message.into()),
        }
    }

    /// Returns `true` if the error is transient and may be resolved in future
    /// attempts.
    pub fn is_transient(&self) -> bool {
        self.is_transient
    }
}

impl std::error::Error for CredentialsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            CredentialsErrorImpl::SimpleMessage(_) => None,
            CredentialsErrorImpl::Source(source) => Some(source.as_ref()),
        }
    }
}

const TRANSIENT_MSG: &str = "but future attempts may succeed";
const PERMANENT_MSG: &str = "and future attempts will not succeed";

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = if self.is_transient {
            TRANSIENT_MSG
        } else {
            PERMANENT_MSG
        };
        match &self.source {
            CredentialsErrorImpl::SimpleMessage(m) => {
                write!(f, "cannot create access token, {msg}, source: {m}")
            }
            CredentialsErrorImpl::Source(s) => {
                write!(f, "cannot create access token, {msg}, source: {s}")
            }
        }
    }
}

pub(crate) fn transient<T: Error + Send + Sync + 'static>(source: T) -> CredentialsError {
    CredentialsError::from_source(true, source)
}

pub(crate) fn permanent<T: Error + Send + Sync + 'static>(source: T) -> CredentialsError {
    CredentialsError::from_source(false, source)
}

pub(crate) fn permanent_from_str<T: Into<String>>(message: T) -> CredentialsError {
    CredentialsError::from_msg(false, message)
}

/// Returns true if a token endpoint response with this status may succeed
/// on a future attempt.
pub(crate) fn is_transient_http_status(c: StatusCode) -> bool {
    matches!(
        c,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE)]
    #[test_case(StatusCode::REQUEST_TIMEOUT)]
    #[test_case(StatusCode::TOO_MANY_REQUESTS)]
    fn transient_status(c: StatusCode) {
        assert!(is_transient_http_status(c));
    }

    #[test_case(StatusCode::NOT_FOUND)]
    #[test_case(StatusCode::UNAUTHORIZED)]
    #[test_case(StatusCode::BAD_REQUEST)]
    #[test_case(StatusCode::BAD_GATEWAY)]
    #[test_case(StatusCode::PRECONDITION_FAILED)]
    fn permanent_status(c: StatusCode) {
        assert!(!is_transient_http_status(c));
    }

    #[test]
    fn fmt() {
        let e = CredentialsError::from_msg(true, "test-only-err-123");
        let got = format!("{e}");
        assert!(got.contains("test-only-err-123"), "{got}");
        assert!(got.contains(TRANSIENT_MSG), "{got}");

        let e = CredentialsError::from_msg(false, "test-only-err-123");
        let got = format!("{e}");
        assert!(got.contains("test-only-err-123"), "{got}");
        assert!(got.contains(PERMANENT_MSG), "{got}");
    }

    #[test]
    fn source() {
        let e = transient(std::io::Error::other("connection reset"));
        assert!(e.is_transient(), "{e:?}");
        let source = e
            .source()
            .and_then(|e| e.downcast_ref::<std::io::Error>());
        assert!(source.is_some(), "{e:?}");

        let e = permanent_from_str("bad key");
        assert!(!e.is_transient(), "{e:?}");
        assert!(e.source().is_none(), "{e:?}");
    }
}
