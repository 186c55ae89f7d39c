//! API error type shared by every handler.
//!
//! A soft redirect keeps the status code and a named client-side navigation
//! target apart from the human-readable message, so browser callers can
//! route to the login page on any trust-chain failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Navigation target for failures that invalidate the caller's identity.
pub const REDIRECT_LOGIN: &str = "login";

/// Generic message for 500 responses.
pub const SERVER_ERROR: &str = "Server Error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    SoftRedirect {
        status: StatusCode,
        message: String,
        redirect: &'static str,
    },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// 401 carrying the login redirect hint.
    pub fn login_redirect(message: impl Into<String>) -> Self {
        ApiError::SoftRedirect {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
            redirect: REDIRECT_LOGIN,
        }
    }

    pub fn internal() -> Self {
        ApiError::Internal(SERVER_ERROR.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SoftRedirect { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) | ApiError::Internal(message) => ErrorResponse {
                message,
                redirect: None,
            },
            ApiError::SoftRedirect {
                message, redirect, ..
            } => ErrorResponse {
                message,
                redirect: Some(redirect),
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
