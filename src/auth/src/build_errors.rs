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

//! Errors created during credentials construction.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for the [Credentials] builder.
///
/// These errors are detected before any network call: no credential was
/// configured, the key file could not be read, or the key material is not a
/// valid service account key.
///
/// [Credentials]: super::credentials::Credentials
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// Neither an access token nor a service account key was configured.
    pub fn is_not_configured(&self) -> bool {
        matches!(self.0, ErrorKind::NotConfigured)
    }

    /// A problem finding or opening the credentials file.
    pub fn is_loading(&self) -> bool {
        matches!(self.0, ErrorKind::Loading(_))
    }

    /// A problem parsing the service account key.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// A required field was missing from the service account key.
    pub fn is_missing_field(&self) -> bool {
        matches!(self.0, ErrorKind::MissingField(_))
    }

    pub(crate) fn not_configured() -> Error {
        Error(ErrorKind::NotConfigured)
    }

    /// Create an error representing problems loading or reading a credentials
    /// file.
    pub(crate) fn loading<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Loading(source.into()))
    }

    /// A problem parsing a credentials specification.
    pub(crate) fn parsing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Parsing(source.into()))
    }

    pub(crate) fn missing_field(field: &'static str) -> Error {
        Error(ErrorKind::MissingField(field))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("no credentials configured, provide an access token or a service account key")]
    NotConfigured,
    #[error("could not find or open the credentials file {0}")]
    Loading(#[source] BoxError),
    #[error("cannot parse the service account key {0}")]
    Parsing(#[source] BoxError),
    #[error("missing required field in service account key: {0}")]
    MissingField(&'static str),
}
