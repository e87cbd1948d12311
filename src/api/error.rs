//! Metrics endpoint error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// The gauge table could not be rendered
    Encoding(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Encoding(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode metrics: {msg}"),
            ),
        };

        (status, error_message).into_response()
    }
}

impl From<prometheus::Error> for ApiError {
    fn from(err: prometheus::Error) -> Self {
        ApiError::Encoding(err.to_string())
    }
}
