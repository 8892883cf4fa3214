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

#[cfg(test)]
mod tests {
    use google_cloud_blocks_auth::constants::{CLOUD_PLATFORM_SCOPE, SQLSERVICE_ADMIN_SCOPE};
    use google_cloud_blocks_auth::credentials::Builder;
    use google_cloud_blocks_auth::token::TokenProvider;
    use google_cloud_blocks_auth::token_cache::TokenCache;
    use httptest::matchers::{all_of, contains, request, url_decoded};
    use httptest::responders::{json_encoded, status_code};
    use httptest::{Expectation, Server};
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    fn service_account_key(token_uri: String) -> anyhow::Result<String> {
        let mut rng = rsa::rand_core::OsRng;
        let pk = RsaPrivateKey::new(&mut rng, 2048)?.to_pkcs8_pem(LineEnding::LF)?;
        Ok(json!({
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-private-key-id",
            "private_key": pk.as_str(),
            "client_email": "test-sa@test-project.iam.gserviceaccount.com",
            "token_uri": token_uri,
        })
        .to_string())
    }

    #[tokio::test]
    async fn cached_service_account_token() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/token"),
                request::body(url_decoded(contains((
                    "grant_type",
                    "urn:ietf:params:oauth:grant-type:jwt-bearer"
                )))),
            ])
            .times(1)
            .respond_with(json_encoded(json!({
                "access_token": "test-access-token",
                "token_type": "Bearer",
                "expires_in": 3600,
            }))),
        );

        let creds = Builder::default()
            .service_account_key(service_account_key(server.url("/token").to_string())?)
            .build()?;
        let cache = TokenCache::new(creds.scoped(vec![
            CLOUD_PLATFORM_SCOPE.to_string(),
            SQLSERVICE_ADMIN_SCOPE.to_string(),
        ]));

        for _ in 0..3 {
            let token = cache.token().await?;
            assert_eq!(token.token, "test-access-token");
        }
        Ok(())
    }

    #[tokio::test]
    async fn rejected_assertion() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/token")).respond_with(
                status_code(400)
                    .insert_header("content-type", "application/json")
                    .body(r#"{"error": "invalid_grant", "error_description": "Invalid JWT Signature."}"#),
            ),
        );

        let creds = Builder::default()
            .service_account_key(service_account_key(server.url("/token").to_string())?)
            .build()?;
        let err = creds
            .token(&[CLOUD_PLATFORM_SCOPE.to_string()])
            .await
            .unwrap_err();
        assert!(!err.is_transient(), "{err:?}");
        assert!(err.to_string().contains("Invalid JWT Signature"), "{err}");
        Ok(())
    }
}
