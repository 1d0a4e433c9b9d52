use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::Error;

/// Failures surface to clients as a bare status code, never a body.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, failed validation, or a rejected update
    BadRequest(String),
    /// Nothing to return, including any storage failure on a read
    NoContent(String),
}

impl ApiError {
    pub fn bad_request(error: Error) -> Self {
        ApiError::BadRequest(error.to_string())
    }

    pub fn no_content(error: Error) -> Self {
        ApiError::NoContent(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => {
                log::warn!("bad request: {}", reason);
                StatusCode::BAD_REQUEST.into_response()
            }
            ApiError::NoContent(reason) => {
                log::debug!("no content: {}", reason);
                StatusCode::NO_CONTENT.into_response()
            }
        }
    }
}
