use crate::services::ContentError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::time::Duration;

/// JSON error body: `{ "error": <status reason>, "message": <detail> }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    retry_after: Option<Duration>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", what))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn too_many_requests(retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many attempts, try again later",
            )
        }
    }
}

fn content_status(err: &ContentError) -> StatusCode {
    match err {
        ContentError::NotFound(_) => StatusCode::NOT_FOUND,
        ContentError::InvalidSlug(_) | ContentError::Validation(_) => StatusCode::BAD_REQUEST,
        ContentError::DuplicateSlug(_) | ContentError::DuplicateCategory(_) => {
            StatusCode::CONFLICT
        }
        ContentError::ReadOnly => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": self.message,
        });
        let mut response = (self.status, Json(body)).into_response();
        if let Some(wait) = self.retry_after {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                header::HeaderValue::from(wait.as_secs().max(1)),
            );
        }
        response
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err: anyhow::Error = err.into();
        if let Some(content) = err.downcast_ref::<ContentError>() {
            return Self::new(content_status(content), content.to_string());
        }
        if let Some(rejection) = err.downcast_ref::<JsonRejection>() {
            return Self::new(rejection.status(), rejection.body_text());
        }
        if let Some(rejection) = err.downcast_ref::<QueryRejection>() {
            return Self::new(rejection.status(), rejection.body_text());
        }
        tracing::error!("Application error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
