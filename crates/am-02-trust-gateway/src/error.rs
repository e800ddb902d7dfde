//! Gate error responses.
//!
//! Every rejection carries a JSON body of the form
//! `{ "error": { "code": "...", "message": "..." } }`.

use am_01_trust_engine::TrustError;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// A gate rejection.
#[derive(Debug, Error)]
#[error("{status} {code}: {message}")]
pub struct GateError {
    /// HTTP status sent to the client.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: &'a str,
}

impl GateError {
    /// 403 with `message`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "forbidden",
            message: message.into(),
        }
    }

    /// 500. Engine internals are not echoed to the client.
    pub fn internal(code: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code,
            message: "Trust check could not be completed".to_string(),
        }
    }

    /// Whether this is an authorization denial rather than a failure.
    pub fn is_forbidden(&self) -> bool {
        self.status == StatusCode::FORBIDDEN
    }
}

impl From<&TrustError> for GateError {
    fn from(err: &TrustError) -> Self {
        match err {
            TrustError::Forbidden(message) => GateError::forbidden(message.clone()),
            other => GateError::internal(other.code()),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: &self.message,
            },
        };

        let mut response =
            Response::new(Body::from(serde_json::to_vec(&body).unwrap_or_default()));
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
