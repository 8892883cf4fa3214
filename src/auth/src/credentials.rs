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

//! Types and functions to work with Google Cloud authentication [Credentials].
//!
//! [Credentials]: https://cloud.google.com/docs/authentication#credentials

mod access_token;
mod service_account;

use crate::Result;
use crate::build_errors::Error as BuilderError;
use crate::token::{Token, TokenProvider};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;

/// Names the environment variable holding a pre-minted access token.
pub const ACCESS_TOKEN_VAR: &str = "CLOUDSDK_AUTH_ACCESS_TOKEN";

/// Names the environment variable holding the path to a service account key.
pub const CREDENTIALS_FILE_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// An implementation of [crate::credentials::CredentialsProvider].
///
/// Represents a [Credentials] used to obtain auth [Token]s for the given
/// scopes.
///
/// `Credentials` are cheap to clone, clones share the same credential
/// material. They do not cache tokens, wrap [Credentials::scoped] in a
/// [TokenCache][crate::token_cache::TokenCache] for that.
#[derive(Clone, Debug)]
pub struct Credentials {
    inner: Arc<dyn CredentialsProvider>,
    fingerprint: Arc<str>,
    exchange: bool,
}

impl Credentials {
    /// Returns a builder for `Credentials`.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Obtains a token for `scopes`.
    ///
    /// For service account keys this performs a token exchange on every call.
    pub async fn token(&self, scopes: &[String]) -> Result<Token> {
        self.inner.token(scopes).await
    }

    /// Identifies the credential material.
    ///
    /// A SHA-256 hex digest, two `Credentials` built from the same material
    /// have the same fingerprint. The digest does not reveal the material.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Returns `true` if obtaining a token requires a network exchange.
    ///
    /// Pre-minted access tokens are returned as they are, there is nothing
    /// to cache.
    pub fn requires_exchange(&self) -> bool {
        self.exchange
    }

    /// Binds these credentials to a fixed set of scopes.
    pub fn scoped(&self, scopes: Vec<String>) -> ScopedCredentials {
        ScopedCredentials {
            credentials: self.clone(),
            scopes,
        }
    }
}

/// [Credentials] bound to a set of scopes, usable as a [TokenProvider].
#[derive(Clone, Debug)]
pub struct ScopedCredentials {
    credentials: Credentials,
    scopes: Vec<String>,
}

#[async_trait::async_trait]
impl TokenProvider for ScopedCredentials {
    async fn token(&self) -> Result<Token> {
        self.credentials.token(&self.scopes).await
    }
}

#[async_trait::async_trait]
pub(crate) trait CredentialsProvider: std::fmt::Debug + Send + Sync {
    async fn token(&self, scopes: &[String]) -> Result<Token>;
}

#[derive(Clone)]
enum KeySource {
    Json(String),
    File(PathBuf),
}

/// A builder for [Credentials].
///
/// Exactly one credential is used. A non-empty access token takes precedence
/// over the service account key, in that case the key is never parsed.
///
/// # Example
/// ```
/// # use google_cloud_blocks_auth::credentials::Builder;
/// # fn sample() -> Result<(), google_cloud_blocks_auth::build_errors::Error> {
/// let key = std::fs::read_to_string("service-account.json").unwrap_or_default();
/// let credentials = Builder::default().service_account_key(key).build()?;
/// println!("{}", credentials.fingerprint());
/// # Ok(()) }
/// ```
#[derive(Clone, Default)]
pub struct Builder {
    access_token: Option<String>,
    service_account_key: Option<KeySource>,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match &self.service_account_key {
            None => None,
            Some(KeySource::Json(_)) => Some("[censored]".to_string()),
            Some(KeySource::File(p)) => Some(p.display().to_string()),
        };
        f.debug_struct("Builder")
            .field("access_token", &self.access_token.as_ref().map(|_| "[censored]"))
            .field("service_account_key", &key)
            .finish()
    }
}

impl Builder {
    /// Initializes the builder from the environment.
    ///
    /// Reads the access token from `CLOUDSDK_AUTH_ACCESS_TOKEN` and the path
    /// to a service account key from `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(token) = std::env::var(ACCESS_TOKEN_VAR) {
            builder = builder.access_token(token);
        }
        if let Ok(path) = std::env::var(CREDENTIALS_FILE_VAR) {
            builder = builder.service_account_key_file(path);
        }
        builder
    }

    /// Uses a pre-minted OAuth2 access token.
    pub fn access_token<T: Into<String>>(mut self, v: T) -> Self {
        self.access_token = Some(v.into());
        self
    }

    /// Uses a service account key, in its JSON representation.
    pub fn service_account_key<T: Into<String>>(mut self, v: T) -> Self {
        self.service_account_key = Some(KeySource::Json(v.into()));
        self
    }

    /// Uses a service account key stored in a file.
    ///
    /// The file is read by [Builder::build].
    pub fn service_account_key_file<P: Into<PathBuf>>(mut self, v: P) -> Self {
        self.service_account_key = Some(KeySource::File(v.into()));
        self
    }

    /// Returns a [Credentials] instance.
    ///
    /// # Errors
    /// Returns a [BuilderError] if no credential is configured, the key file
    /// cannot be read, or the service account key is invalid.
    pub fn build(self) -> std::result::Result<Credentials, BuilderError> {
        if let Some(token) = self.access_token.filter(|t| !t.trim().is_empty()) {
            let fingerprint = fingerprint("access_token", &token);
            return Ok(Credentials {
                inner: Arc::new(access_token::AccessTokenCredentials::new(token)),
                fingerprint,
                exchange: false,
            });
        }
        let json = match self.service_account_key {
            None => return Err(BuilderError::not_configured()),
            Some(KeySource::Json(json)) => json,
            Some(KeySource::File(path)) => {
                std::fs::read_to_string(&path).map_err(BuilderError::loading)?
            }
        };
        if json.trim().is_empty() {
            return Err(BuilderError::not_configured());
        }
        let creds = service_account::ServiceAccountCredentials::from_json(&json)?;
        tracing::debug!(
            client_email = creds.client_email(),
            token_uri = creds.token_uri(),
            "loaded service account key"
        );
        Ok(Credentials {
            inner: Arc::new(creds),
            fingerprint: fingerprint("service_account", &json),
            exchange: true,
        })
    }
}

fn fingerprint(kind: &str, material: &str) -> Arc<str> {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update([0_u8]);
    hasher.update(material.as_bytes());
    hex::encode(hasher.finalize()).into()
}
