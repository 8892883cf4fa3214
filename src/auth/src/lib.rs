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

//! Authentication for the Google Cloud workflow blocks.
//!
//! The blocks authenticate with either a pre-minted OAuth2 access token or a
//! service account key. Service account keys are exchanged for access tokens
//! using the [JWT bearer] grant against the key's `token_uri`.
//!
//! ```
//! # use google_cloud_blocks_auth::credentials::Builder;
//! # fn sample() -> Result<(), google_cloud_blocks_auth::build_errors::Error> {
//! let credentials = Builder::default().access_token("ya29.test-only").build()?;
//! # Ok(()) }
//! ```
//!
//! [JWT bearer]: https://datatracker.ietf.org/doc/html/rfc7523

pub mod build_errors;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod token;
pub mod token_cache;

/// A `Result` alias where the `Err` case is [errors::CredentialsError].
pub type Result<T> = std::result::Result<T, errors::CredentialsError>;
