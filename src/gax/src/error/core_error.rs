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

use super::rpc::Status;
use super::{ApiError, CredentialsBuildError, CredentialsError, ValidationError};
use http::{HeaderMap, StatusCode};
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by every block invocation.
///
/// Errors come from several places: the credentials may be missing or
/// malformed, the token exchange may fail, the invocation may be invalid, the
/// service may reject the request, the transport may fail, the response may
/// not decode, or a long-running operation may complete with an error.
///
/// Most applications just return or log the error. Those that need more
/// detail can use the predicates on this type, and query the error
/// [source][std::error::Error::source] for the underlying problem.
///
/// # Example
/// ```
/// use google_cloud_blocks_gax::error::Error;
/// match example_function() {
///     Err(e) if e.is_validation() => { println!("fix the invocation: {e}"); },
///     Err(e) if e.http_status_code() == Some(404) => { println!("not found {e}"); },
///     Err(e) if e.is_transient() => { println!("try again later {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use google_cloud_blocks_gax::error::rpc::{Code, Status};
///     # Err(Error::service(Status::default().set_code(Code::NotFound).set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error for credentials that could not be constructed.
    pub fn credentials(source: CredentialsBuildError) -> Self {
        Self {
            kind: ErrorKind::Credentials,
            source: Some(source.into()),
        }
    }

    /// No credentials were configured, or the configured key is malformed.
    ///
    /// This error is detected before any network call.
    ///
    /// # Troubleshooting
    ///
    /// Provide either an access token or a service account key. If you
    /// provided a key, verify it is the full JSON file downloaded from the
    /// Google Cloud console, including `client_email` and `private_key`.
    pub fn is_credentials(&self) -> bool {
        matches!(self.kind, ErrorKind::Credentials)
    }

    /// Creates an error for a failed token exchange.
    pub fn authentication(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// The credentials could not be exchanged for an access token.
    ///
    /// The source is a [CredentialsError], which records whether a future
    /// attempt may succeed.
    ///
    /// # Troubleshooting
    ///
    /// A permanent failure usually means the service account key was revoked,
    /// the account is disabled, or the local clock is badly skewed.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Creates an error for an invalid invocation.
    pub fn validation(source: ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation,
            source: Some(source.into()),
        }
    }

    /// The invocation is missing required fields, or some field has the
    /// wrong type.
    ///
    /// This error is detected before any network call, including the token
    /// exchange. Use [as_inner][Error::as_inner] to get the
    /// [ValidationError].
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation)
    }

    /// Creates an error from a non-2xx response.
    pub fn api(error: ApiError) -> Self {
        Self {
            kind: ErrorKind::Api(Box::new(error)),
            source: None,
        }
    }

    /// The service responded with a non-2xx status.
    pub fn is_api(&self) -> bool {
        matches!(self.kind, ErrorKind::Api(_))
    }

    /// The full response details for [is_api][Error::is_api] errors.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Creates an error with the status of a failed long-running operation.
    ///
    /// # Example
    /// ```
    /// use google_cloud_blocks_gax::error::Error;
    /// use google_cloud_blocks_gax::error::rpc::{Code, Status};
    /// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(status)),
            source: None,
        }
    }

    /// A long-running operation completed with an error.
    ///
    /// Use [status][Error::status] to inspect the operation error.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service(_))
    }

    /// The [Status] associated with this error.
    ///
    /// This is the error of a long-running operation that completed
    /// unsuccessfully, or the parsed error body of an API error.
    ///
    /// See [AIP-193] for background information about the error model in
    /// Google Cloud services.
    ///
    /// [AIP-193]: https://google.aip.dev/193
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(s) => Some(s.as_ref()),
            ErrorKind::Api(e) => e.details(),
            _ => None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    pub fn http_status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status().as_u16())
    }

    /// The response headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        self.api_error().map(|e| e.headers())
    }

    /// The response payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        self.api_error().map(|e| e.payload())
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_blocks_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before the HTTP client timeout.
    ///
    /// The request may or may not have reached the service. If the request
    /// mutates any state in the service, it may or may not be safe to attempt
    /// the request again.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing an exhausted polling policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_blocks_gax::error::Error;
    /// let error = Error::exhausted("too many polling attempts");
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            source: Some(source.into()),
        }
    }

    /// The long-running operation did not complete before the polling policy
    /// expired.
    ///
    /// The operation may still complete in the service.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an error representing a problem decoding a response.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response body is not valid JSON.
    ///
    /// The request reached the service and may have changed its state.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a problem encoding a request.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be encoded. This error is never transient.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error for a transport problem without an HTTP response.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include DNS failures, refused connections, and connections
    /// broken after the request is sent.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Returns true if a future attempt of the same call may succeed.
    ///
    /// The dispatcher never retries. This predicate lets callers decide
    /// whether to do so: transport problems, timeouts, transient
    /// authentication failures, and API errors with status 408, 429, 500, or
    /// 503 are transient.
    pub fn is_transient(&self) -> bool {
        match &self.kind {
            ErrorKind::Io | ErrorKind::Timeout => true,
            ErrorKind::Authentication => self.is_transient_authentication(),
            ErrorKind::Api(e) => matches!(
                e.status(),
                StatusCode::REQUEST_TIMEOUT
                    | StatusCode::TOO_MANY_REQUESTS
                    | StatusCode::INTERNAL_SERVER_ERROR
                    | StatusCode::SERVICE_UNAVAILABLE
            ),
            _ => false,
        }
    }

    /// Finds the first error of type `T` in the source chain.
    ///
    /// # Example
    /// ```
    /// use google_cloud_blocks_gax::error::{Error, ValidationError};
    /// let error = Error::validation(ValidationError::MissingField("instance".into()));
    /// let inner = error.as_inner::<ValidationError>();
    /// assert!(matches!(inner, Some(ValidationError::MissingField(f)) if f == "instance"));
    /// ```
    pub fn as_inner<T: StdError + 'static>(&self) -> Option<&T> {
        let mut e = self.source()?;
        loop {
            if let Some(t) = e.downcast_ref::<T>() {
                return Some(t);
            }
            e = e.source()?;
        }
    }

    pub(crate) fn is_transient_authentication(&self) -> bool {
        if !matches!(&self.kind, ErrorKind::Authentication) {
            return false;
        }
        self.as_inner::<CredentialsError>()
            .map(|e| e.is_transient())
            .unwrap_or(false)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Credentials, Some(e)) => {
                write!(f, "cannot create the credentials {e}")
            }
            (ErrorKind::Authentication, Some(e)) => {
                write!(f, "cannot create the authentication headers {e}")
            }
            (ErrorKind::Validation, Some(e)) => write!(f, "invalid invocation: {e}"),
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Io, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the client timeout {e}")
            }
            (ErrorKind::Exhausted, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Api(e), _) => write!(f, "{e}"),
            (ErrorKind::Service(s), _) => write!(
                f,
                "the operation completed with an error, code {} described as: {}",
                s.code, s.message
            ),
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Credentials,
    Authentication,
    Validation,
    Api(Box<ApiError>),
    Serialization,
    Deserialization,
    Io,
    Timeout,
    Exhausted,
    Service(Box<Status>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::Code;
    use bytes::Bytes;
    use std::error::Error as StdError;
    use test_case::test_case;

    #[test]
    fn credentials() {
        let source = auth::credentials::Builder::default()
            .build()
            .expect_err("no credentials configured");
        let error = Error::credentials(source);
        assert!(error.is_credentials(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");
        let got = error.as_inner::<CredentialsBuildError>();
        assert!(matches!(got, Some(e) if e.is_not_configured()), "{error:?}");
        assert!(error.to_string().contains("no credentials"), "{error}");
    }

    #[test_case(true)]
    #[test_case(false)]
    fn authentication(transient: bool) {
        let source = CredentialsError::from_msg(transient, "test-message");
        let error = Error::authentication(source);
        assert!(error.is_authentication(), "{error:?}");
        let got = error.as_inner::<CredentialsError>();
        assert!(matches!(got, Some(c) if c.is_transient() == transient), "{error:?}");
        assert!(error.to_string().contains("test-message"), "{error}");
        assert_eq!(error.is_transient(), transient, "{error:?}");
        assert_eq!(error.is_transient_authentication(), transient, "{error:?}");
    }

    #[test]
    fn validation() {
        let error = Error::validation(ValidationError::MissingField("instance".into()));
        assert!(error.is_validation(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");
        assert!(error.to_string().contains("instance"), "{error}");
        assert!(error.status().is_none(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
    }

    #[test_case(StatusCode::REQUEST_TIMEOUT, true)]
    #[test_case(StatusCode::TOO_MANY_REQUESTS, true)]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[test_case(StatusCode::BAD_REQUEST, false)]
    #[test_case(StatusCode::NOT_FOUND, false)]
    #[test_case(StatusCode::BAD_GATEWAY, false)]
    fn api(status: StatusCode, transient: bool) {
        let mut headers = HeaderMap::new();
        headers.insert("x-test-only", "v".parse().unwrap());
        let payload = Bytes::from_static(b"uh-oh");
        let error = Error::api(ApiError::new(status, headers.clone(), payload.clone()));
        assert!(error.is_api(), "{error:?}");
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(status.as_u16()));
        assert_eq!(error.http_headers(), Some(&headers));
        assert_eq!(error.http_payload(), Some(&payload));
        assert!(error.status().is_none(), "{error:?}");
        assert_eq!(error.is_transient(), transient, "{error:?}");
        assert!(error.to_string().contains("uh-oh"), "{error}");
    }

    #[test]
    fn api_with_status() {
        let payload = serde_json::json!({"error": {
            "code": 404, "message": "not there", "status": "NOT_FOUND"
        }});
        let error = Error::api(ApiError::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            Bytes::from(payload.to_string()),
        ));
        let status = error.status().unwrap();
        assert_eq!(status.code, Code::NotFound);
        assert_eq!(status.message, "not there");
        assert!(error.api_error().is_some(), "{error:?}");
    }

    #[test]
    fn service() {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("NOT FOUND");
        let error = Error::service(status.clone());
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.status(), Some(&status));
        assert!(error.to_string().contains("NOT FOUND"), "{error}");
        assert!(error.to_string().contains(Code::NotFound.name()), "{error}");
        assert!(!error.is_transient(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
    }

    #[test]
    fn timeout() {
        let error = Error::timeout(std::io::Error::other("deadline"));
        assert!(error.is_timeout(), "{error:?}");
        assert!(error.is_transient(), "{error:?}");
        assert!(error.as_inner::<std::io::Error>().is_some(), "{error:?}");
        assert!(error.to_string().contains("deadline"), "{error}");
        assert!(error.http_headers().is_none(), "{error:?}");
    }

    #[test]
    fn exhausted() {
        let error = Error::exhausted(Error::service(Status::default()));
        assert!(error.is_exhausted(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");
        let inner = error.as_inner::<Error>();
        assert!(matches!(inner, Some(e) if e.status().is_some()), "{error:?}");
    }

    #[test]
    fn io() {
        let error = Error::io(std::io::Error::other("connection reset"));
        assert!(error.is_io(), "{error:?}");
        assert!(error.is_transient(), "{error:?}");
        assert!(error.to_string().contains("connection reset"), "{error}");
    }

    #[test]
    fn serialization() {
        let error = Error::ser("cannot encode");
        assert!(error.is_serialization(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::deser(source);
        assert!(error.is_deserialization(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");
        assert!(error.as_inner::<serde_json::Error>().is_some(), "{error:?}");
    }

    #[test]
    fn as_inner_nested() {
        let error = Error::exhausted(Error::validation(ValidationError::MissingField(
            "name".into(),
        )));
        let got = error.as_inner::<ValidationError>();
        assert!(matches!(got, Some(ValidationError::MissingField(_))), "{error:?}");
        assert!(error.as_inner::<std::io::Error>().is_none(), "{error:?}");
    }
}
