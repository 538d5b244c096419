use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use sawaari_core::Error;

/// Wraps the shared error taxonomy for axum. Every operation maps its
/// error kind to a stable status code and a descriptive JSON message;
/// backend details are logged, never leaked.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Storage(msg) | Error::Mail(msg) | Error::Asset(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({ "message": message }));
        (status, body).into_response()
    }
}

pub fn forbidden(msg: &str) -> ApiError {
    ApiError(Error::Forbidden(msg.to_owned()))
}

pub fn invalid(msg: &str) -> ApiError {
    ApiError(Error::InvalidInput(msg.to_owned()))
}
