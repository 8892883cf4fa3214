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

//! Dispatcher configuration.
//!
//! The defaults work for most applications, but the project id and the
//! credentials are almost always needed. Applications running in a workflow
//! runner typically load them from the environment with
//! [ClientConfig::from_env], and tests point the dispatcher at a local server
//! using [ClientConfig::set_endpoint_override].

use auth::credentials::Builder as CredentialsBuilder;
use std::collections::BTreeMap;

pub(crate) const LOGGING_VAR: &str = "GOOGLE_CLOUD_BLOCKS_LOGGING";
pub const PROJECT_VAR: &str = "GOOGLE_CLOUD_PROJECT";
pub const QUOTA_PROJECT_VAR: &str = "GOOGLE_CLOUD_QUOTA_PROJECT";

/// The configuration shared by all the invocations of a
/// [Dispatcher][crate::dispatcher::Dispatcher].
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub(crate) project_id: Option<String>,
    pub(crate) quota_project_id: Option<String>,
    pub(crate) credentials: Option<CredentialsBuilder>,
    pub(crate) endpoint_overrides: BTreeMap<String, String>,
    pub(crate) strict_types: bool,
    pub(crate) tracing: bool,
}

impl ClientConfig {
    /// Returns a default [ClientConfig].
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from the environment.
    ///
    /// | variable | setting |
    /// |----------|---------|
    /// | `GOOGLE_CLOUD_PROJECT` | the project id |
    /// | `GOOGLE_CLOUD_QUOTA_PROJECT` | the quota project id |
    /// | `CLOUDSDK_AUTH_ACCESS_TOKEN` | a pre-minted access token |
    /// | `GOOGLE_APPLICATION_CREDENTIALS` | the path of a service account key file |
    /// | `GOOGLE_CLOUD_BLOCKS_LOGGING` | `true` enables tracing |
    ///
    /// Empty variables are ignored. The credentials are not loaded until they
    /// are first used.
    pub fn from_env() -> Self {
        Self {
            project_id: non_empty_var(PROJECT_VAR),
            quota_project_id: non_empty_var(QUOTA_PROJECT_VAR),
            credentials: Some(CredentialsBuilder::from_env()),
            ..Default::default()
        }
    }

    /// Sets the project id used for [Project][crate::descriptor::Location::Project] fields.
    pub fn set_project_id<T: Into<String>>(mut self, v: T) -> Self {
        self.project_id = Some(v.into());
        self
    }

    /// Sets the project billed for quota, sent as `x-goog-user-project`.
    pub fn set_quota_project_id<T: Into<String>>(mut self, v: T) -> Self {
        self.quota_project_id = Some(v.into());
        self
    }

    /// Configures the credentials.
    ///
    /// The credentials are built when first needed. Errors in the
    /// configuration, such as a malformed key, are reported by the first
    /// invocation.
    pub fn set_credentials(mut self, v: CredentialsBuilder) -> Self {
        self.credentials = Some(v);
        self
    }

    /// Sends requests for `host` to `url` instead.
    ///
    /// The path of the endpoint is preserved: with an override from
    /// `sqladmin.googleapis.com` to `http://127.0.0.1:8080`, a request for
    /// `https://sqladmin.googleapis.com/v1/flags` goes to
    /// `http://127.0.0.1:8080/v1/flags`.
    pub fn set_endpoint_override<H, U>(mut self, host: H, url: U) -> Self
    where
        H: Into<String>,
        U: Into<String>,
    {
        self.endpoint_overrides.insert(host.into(), url.into());
        self
    }

    /// Enables type checking of the invocation fields.
    pub fn set_strict_types(mut self, v: bool) -> Self {
        self.strict_types = v;
        self
    }

    /// Enables tracing.
    pub fn set_tracing(mut self, v: bool) -> Self {
        self.tracing = v;
        self
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn quota_project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }

    pub fn strict_types(&self) -> bool {
        self.strict_types
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// Returns true if the environment or client configuration enables tracing.
pub(crate) fn tracing_enabled(config: &ClientConfig) -> bool {
    if config.tracing {
        return true;
    }
    std::env::var(LOGGING_VAR)
        .map(|v| v == "true")
        .unwrap_or(false)
}
