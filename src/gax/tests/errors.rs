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

#[cfg(test)]
mod tests {
    use google_cloud_blocks_gax::error::rpc::{Code, Status};
    use google_cloud_blocks_gax::error::{ApiError, Error, ValidationError};
    use google_cloud_blocks_gax::polling_error_policy::Exhausted;
    use http::{HeaderMap, StatusCode};
    use std::error::Error as _;

    #[test]
    fn api_error_details() {
        let payload = serde_json::json!({"error": {
            "code": 409,
            "message": "The instance already exists.",
            "status": "ALREADY_EXISTS",
            "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "DUPLICATE"}],
        }})
        .to_string();
        let error = Error::api(ApiError::new(
            StatusCode::CONFLICT,
            HeaderMap::new(),
            bytes::Bytes::from(payload),
        ));
        assert!(error.is_api(), "{error:?}");
        assert!(!error.is_transient(), "{error:?}");
        let status = error.status().unwrap();
        assert_eq!(status.code, Code::AlreadyExists);
        assert_eq!(status.details.len(), 1);
        assert!(error.to_string().contains("409"), "{error}");
    }

    #[test]
    fn as_inner() {
        let error = Error::validation(ValidationError::MissingField("instance".into()));
        assert!(error.source().is_some());
        assert!(matches!(
            error.as_inner::<ValidationError>(),
            Some(ValidationError::MissingField(_))
        ));

        let error = Error::exhausted(Exhausted::new(
            "operations/op-1",
            "attempt count",
            "5".to_string(),
            "5".to_string(),
        ));
        let inner = error.as_inner::<Exhausted>().unwrap();
        assert_eq!(inner.operation_name(), "operations/op-1");
    }

    #[test]
    fn service_status() {
        let status = Status::default()
            .set_code(Code::FailedPrecondition)
            .set_message("instance is stopped");
        let error = Error::service(status.clone());
        assert!(error.is_service(), "{error:?}");
        assert_eq!(error.status(), Some(&status));
        assert!(error.http_status_code().is_none());
    }
}
