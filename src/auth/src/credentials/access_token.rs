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

//! Credentials backed by a pre-minted access token.

use crate::Result;
use crate::credentials::CredentialsProvider;
use crate::token::Token;

/// Returns the same token for any scopes.
///
/// The token was minted elsewhere (e.g. `gcloud auth print-access-token`),
/// its scopes and expiration are unknown.
#[derive(Debug)]
pub(crate) struct AccessTokenCredentials {
    token: Token,
}

impl AccessTokenCredentials {
    pub(crate) fn new(token: String) -> Self {
        Self {
            token: Token {
                token,
                token_type: "Bearer".to_string(),
                expires_at: None,
            },
        }
    }
}

#[async_trait::async_trait]
impl CredentialsProvider for AccessTokenCredentials {
    async fn token(&self, _scopes: &[String]) -> Result<Token> {
        Ok(self.token.clone())
    }
}
