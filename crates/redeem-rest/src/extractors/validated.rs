//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes a JSON body and validates it with the
//! `validator` crate. Validation errors are returned as 422 Unprocessable
//! Entity with field-level details; malformed JSON is a 400.

use crate::responses::ApiResponse;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use redeem_core::{field_errors, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
///
/// ```ignore
/// async fn redeem(ValidatedJson(request): ValidatedJson<RedemptionRequest>) {
///     // request.mobile and request.gift_code passed their rules here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::JsonError(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                    trace_id: None,
                },
            ),
            Self::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: None,
                    trace_id: None,
                }
                .with_details(field_errors(&errors)),
            ),
        };

        (status, Json(ApiResponse::<()>::error(error))).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use redeem_service::RedemptionRequest;

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/discount")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let extracted = ValidatedJson::<RedemptionRequest>::from_request(
            json_request(r#"{"mobile":"+15550001111","giftCode":"WELCOME10"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(extracted.mobile, "+15550001111");
        assert_eq!(extracted.gift_code, "WELCOME10");
    }

    #[tokio::test]
    async fn test_invalid_fields_are_unprocessable() {
        let rejection = ValidatedJson::<RedemptionRequest>::from_request(
            json_request(r#"{"mobile":"not-a-phone","giftCode":""}"#),
            &(),
        )
        .await
        .unwrap_err();

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"mobile"));
        assert!(fields.contains(&"gift_code"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let rejection =
            ValidatedJson::<RedemptionRequest>::from_request(json_request("{not json"), &())
                .await
                .unwrap_err();

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_JSON");
    }
}
