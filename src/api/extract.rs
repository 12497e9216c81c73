//! Extractor wrappers whose rejections use the API error payload.

use crate::types::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

/// `axum::Json`, rejecting malformed bodies with `AppError::BadRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with the same rejection mapping.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` with the same rejection mapping.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();

        // serde reports "missing field `email` at line 1 column 2"
        if let Some(start) = message.find("missing field `") {
            let rest = &message[start + "missing field `".len()..];
            if let Some(end) = rest.find('`') {
                return AppError::BadRequest(format!("Missing required field: {}", &rest[..end]));
            }
        }

        AppError::BadRequest(message)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        email: String,
    }

    async fn accept(ApiJson(_): ApiJson<Payload>) -> StatusCode {
        StatusCode::NO_CONTENT
    }

    async fn send(body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/", post(accept))
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_payload() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_missing_field_names_the_field() {
        let (status, body) = send("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: email");
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = send(r#"{"email":"a@x.com"}"#).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
