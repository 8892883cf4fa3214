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

use crate::Result;
use crate::errors;
use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use std::time::Duration;
use time::OffsetDateTime;

/// The claims set for the JWT bearer assertion.
///
/// See <https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests>
#[derive(Serialize)]
pub(crate) struct JwsClaims<'a> {
    pub iss: &'a str,
    pub scope: String,
    pub aud: &'a str,
    #[serde(with = "time::serde::timestamp")]
    pub exp: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub iat: OffsetDateTime,
    pub sub: &'a str,
}

impl JwsClaims<'_> {
    pub fn encode(&self) -> Result<String> {
        if self.exp < self.iat {
            return Err(errors::permanent_from_str("exp must be later than iat"));
        }
        if self.exp - self.iat > Duration::from_secs(3600) {
            return Err(errors::permanent_from_str(
                "the assertion lifetime cannot exceed one hour",
            ));
        }
        let json = serde_json::to_string(&self).map_err(errors::permanent)?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }
}

/// The header that describes who, what, how a token was created.
#[derive(Serialize)]
pub(crate) struct JwsHeader<'a> {
    pub alg: &'a str,
    pub typ: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<&'a str>,
}

impl JwsHeader<'_> {
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(&self).map_err(errors::permanent)?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }
}
