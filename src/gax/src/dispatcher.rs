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

//! Sends one request per invocation of an endpoint.
//!
//! A [Dispatcher] turns an [EndpointDescriptor] and an [Invocation] into a
//! decoded JSON value. Each call:
//!
//! 1. validates the invocation, before any network call,
//! 2. obtains an access token for the endpoint scopes, reusing cached tokens,
//! 3. builds the request, see [Dispatcher::build_request],
//! 4. sends it exactly once, see [Dispatcher::dispatch].
//!
//! Nothing is retried. [Error::is_transient] tells callers which failures may
//! succeed on a second attempt.
//!
//! # Example
//! ```no_run
//! # use google_cloud_blocks_gax::dispatcher::Dispatcher;
//! # use google_cloud_blocks_gax::descriptor::{EndpointDescriptor, Field};
//! # use google_cloud_blocks_gax::invocation::Invocation;
//! # use auth::credentials::Builder;
//! # async fn sample() -> google_cloud_blocks_gax::Result<()> {
//! let dispatcher = Dispatcher::builder()
//!     .with_credentials_builder(Builder::default().access_token("ya29.test-only"))
//!     .with_project_id("my-project")
//!     .build();
//! let endpoint = EndpointDescriptor::new(
//!     "sqladmin.instances.get",
//!     http::Method::GET,
//!     "https://sqladmin.googleapis.com/",
//!     "v1/projects/{project}/instances/{instance}",
//! )
//! .with_field(Field::project("project"))
//! .with_field(Field::path("instance"));
//! let instance = dispatcher
//!     .invoke(&endpoint, &Invocation::new().set("instance", "my-instance"))
//!     .await?;
//! println!("{instance}");
//! # Ok(()) }
//! ```

use crate::Result;
use crate::descriptor::EndpointDescriptor;
use crate::error::{ApiError, Error};
use crate::invocation::Invocation;
use crate::observability::{create_http_span, record_http_response_attributes};
use crate::options::{ClientConfig, tracing_enabled};
use crate::request::{self, HttpRequest};
use auth::credentials::{Builder as CredentialsBuilder, Credentials, ScopedCredentials};
use auth::token::{Token, TokenProvider};
use auth::token_cache::TokenCache;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::Instrument;

type CacheKey = (String, Vec<String>);

/// Resolves credentials and sends requests for endpoint invocations.
///
/// Dispatchers are cheap to clone, clones share the HTTP client, the
/// configuration, and the token cache.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    shared: Arc<Shared>,
    credentials: Arc<CredentialsSlot>,
}

#[derive(Debug)]
struct Shared {
    client: reqwest::Client,
    config: ClientConfig,
    tracing: bool,
    // Keyed by credentials fingerprint and scopes. The lock is only held for
    // the lookup, never across an `.await`.
    tokens: Mutex<HashMap<CacheKey, TokenCache<ScopedCredentials>>>,
}

// The credentials are built on first use, so configuration problems surface
// as errors of the first invocation.
#[derive(Debug)]
struct CredentialsSlot {
    builder: Option<CredentialsBuilder>,
    credentials: OnceCell<Credentials>,
}

impl CredentialsSlot {
    fn lazy(builder: Option<CredentialsBuilder>) -> Self {
        Self {
            builder,
            credentials: OnceCell::new(),
        }
    }

    fn ready(credentials: Credentials) -> Self {
        Self {
            builder: None,
            credentials: OnceCell::new_with(Some(credentials)),
        }
    }

    async fn get(&self) -> Result<&Credentials> {
        self.credentials
            .get_or_try_init(|| async {
                self.builder
                    .clone()
                    .unwrap_or_default()
                    .build()
                    .map_err(Error::credentials)
            })
            .await
    }
}

impl Dispatcher {
    /// Returns a builder with the default configuration.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Creates a dispatcher configured from the environment.
    ///
    /// See [ClientConfig::from_env] for the variables.
    pub fn from_env() -> Self {
        DispatcherBuilder::from_config(ClientConfig::from_env()).build()
    }

    /// The configuration used by this dispatcher.
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Returns a dispatcher using `credentials` instead of the configured
    /// ones.
    ///
    /// The new dispatcher shares the HTTP client and the token cache with
    /// `self`. Tokens are cached per credential, the two dispatchers never
    /// see each other's tokens. Access tokens are not cached, and cached
    /// tokens are dropped once they expire.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self {
            shared: self.shared.clone(),
            credentials: Arc::new(CredentialsSlot::ready(credentials)),
        }
    }

    /// Calls `endpoint` with the values in `invocation`.
    ///
    /// The invocation is validated before the credentials are used, invalid
    /// invocations never reach the network.
    pub async fn invoke(
        &self,
        endpoint: &EndpointDescriptor,
        invocation: &Invocation,
    ) -> Result<Value> {
        let config = &self.shared.config;
        invocation
            .validate(endpoint, config.project_id(), config.strict_types())
            .map_err(Error::validation)?;
        let token = self.resolve_token(endpoint.scopes()).await?;
        let request = self.build_request(endpoint, invocation, &token)?;
        self.dispatch(request).await
    }

    /// Returns an access token for `scopes`.
    ///
    /// Pre-minted access tokens are returned unchanged and never cached.
    /// Service account keys are exchanged for a token, which is cached until
    /// shortly before it expires. Concurrent callers share a single exchange.
    pub async fn resolve_token(&self, scopes: &[String]) -> Result<Token> {
        let credentials = self.credentials.get().await?;
        if !credentials.requires_exchange() {
            return credentials
                .token(scopes)
                .await
                .map_err(Error::authentication);
        }
        let key = (credentials.fingerprint().to_string(), scopes.to_vec());
        let cache = {
            let mut tokens = self
                .shared
                .tokens
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if !tokens.contains_key(&key) {
                // Expired entries of other credentials are dropped, the map
                // only holds tokens that are still useful.
                tokens.retain(|_, cache| !cache.is_stale());
            }
            tokens
                .entry(key)
                .or_insert_with(|| TokenCache::new(credentials.scoped(scopes.to_vec())))
                .clone()
        };
        cache.token().await.map_err(Error::authentication)
    }

    /// Builds the request for `endpoint`, without sending it.
    ///
    /// Fails with a validation error if the invocation does not satisfy the
    /// endpoint fields.
    pub fn build_request(
        &self,
        endpoint: &EndpointDescriptor,
        invocation: &Invocation,
        token: &Token,
    ) -> Result<HttpRequest> {
        request::build_request(&self.shared.config, endpoint, invocation, token)
    }

    /// Sends `request` and decodes the response.
    ///
    /// Successful responses with an empty body decode as `{}`. Responses
    /// with a non-2xx status become [ApiError]s.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<Value> {
        if !self.shared.tracing {
            return self.send(request).await.map(|(_, v)| v);
        }
        let span = create_http_span(&request);
        let result = self.send(request).instrument(span.clone()).await;
        record_http_response_attributes(&span, result.as_ref().map(|(status, _)| *status));
        result.map(|(_, v)| v)
    }

    async fn send(&self, request: HttpRequest) -> Result<(u16, Value)> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            endpoint_id,
            ..
        } = request;
        let mut builder = self.shared.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            let error = to_http_error(response).await;
            tracing::warn!(
                endpoint = endpoint_id,
                status = status.as_u16(),
                "request failed"
            );
            return Err(error);
        }
        let value = to_http_response(response).await?;
        Ok((status.as_u16(), value))
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    match err {
        e if e.is_timeout() => Error::timeout(e),
        e => Error::io(e),
    }
}

async fn to_http_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let headers = response.headers().clone();
    match response.bytes().await {
        Ok(payload) => Error::api(ApiError::new(status, headers, payload)),
        Err(e) => Error::io(e),
    }
}

async fn to_http_response(response: reqwest::Response) -> Result<Value> {
    let payload = response.bytes().await.map_err(Error::io)?;
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(&payload).map_err(Error::deser)
}

/// Configures a [Dispatcher].
///
/// # Example
/// ```
/// # use google_cloud_blocks_gax::dispatcher::Dispatcher;
/// # use auth::credentials::Builder;
/// let dispatcher = Dispatcher::builder()
///     .with_credentials_builder(Builder::default().access_token("ya29.test-only"))
///     .with_project_id("my-project")
///     .with_quota_project_id("my-billing-project")
///     .with_strict_types(true)
///     .build();
/// assert_eq!(dispatcher.config().project_id(), Some("my-project"));
/// ```
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    config: ClientConfig,
    credentials: Option<Credentials>,
    client: Option<reqwest::Client>,
}

impl DispatcherBuilder {
    /// Starts from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Uses prebuilt credentials.
    ///
    /// Takes precedence over [with_credentials_builder][Self::with_credentials_builder].
    pub fn with_credentials(mut self, v: Credentials) -> Self {
        self.credentials = Some(v);
        self
    }

    /// Builds the credentials on first use.
    pub fn with_credentials_builder(mut self, v: CredentialsBuilder) -> Self {
        self.config = self.config.set_credentials(v);
        self
    }

    /// Sets the project id used for project fields.
    pub fn with_project_id<T: Into<String>>(mut self, v: T) -> Self {
        self.config = self.config.set_project_id(v);
        self
    }

    /// Sets the project billed for quota, sent as `x-goog-user-project`.
    pub fn with_quota_project_id<T: Into<String>>(mut self, v: T) -> Self {
        self.config = self.config.set_quota_project_id(v);
        self
    }

    /// Sends requests for `host` to `url`.
    pub fn with_endpoint_override<H, U>(mut self, host: H, url: U) -> Self
    where
        H: Into<String>,
        U: Into<String>,
    {
        self.config = self.config.set_endpoint_override(host, url);
        self
    }

    /// Checks the type of each invocation value against its field.
    pub fn with_strict_types(mut self, v: bool) -> Self {
        self.config = self.config.set_strict_types(v);
        self
    }

    /// Creates a tracing span for each request.
    pub fn with_tracing(mut self, v: bool) -> Self {
        self.config = self.config.set_tracing(v);
        self
    }

    /// Uses `v` to send requests.
    ///
    /// Use this to configure timeouts, proxies, or connection pools. The
    /// client is shared by all clones of the dispatcher.
    pub fn with_http_client(mut self, v: reqwest::Client) -> Self {
        self.client = Some(v);
        self
    }

    pub fn build(self) -> Dispatcher {
        let credentials = match self.credentials {
            Some(c) => CredentialsSlot::ready(c),
            None => CredentialsSlot::lazy(self.config.credentials.clone()),
        };
        let tracing = tracing_enabled(&self.config);
        Dispatcher {
            shared: Arc::new(Shared {
                client: self.client.unwrap_or_default(),
                config: self.config,
                tracing,
                tokens: Mutex::new(HashMap::new()),
            }),
            credentials: Arc::new(credentials),
        }
    }
}
