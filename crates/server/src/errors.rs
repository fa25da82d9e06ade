use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::{code, Envelope};
use serde_json::{Map, Value};
use service::{auth::errors::AuthError, errors::ServiceError};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

pub const INVALID_ARGUMENTS: &str = "Provided arguments are invalid, see data for details.";
pub const INTERNAL_ERROR: &str = "A server internal error occurs.";
pub const MISSING_CREDENTIALS: &str = "Login credentials are missing.";
pub const ENDPOINT_NOT_FOUND: &str = "This API endpoint is not found.";

/// Every handler failure, rendered as the response envelope with a matching HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidArgument { message: String, data: Option<Value> },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Detail is logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> u16 {
        match self {
            ApiError::InvalidArgument { .. } => code::INVALID_ARGUMENT,
            ApiError::Unauthorized(_) => code::UNAUTHORIZED,
            ApiError::NotFound(_) => code::NOT_FOUND,
            ApiError::Conflict(_) => code::CONFLICT,
            ApiError::Internal(_) => code::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument { message: message.into(), data: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Envelope = match self {
            ApiError::InvalidArgument { message, data } => Envelope::failure(code, message, data),
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                Envelope::failure(code, INTERNAL_ERROR, None)
            }
            other => Envelope::failure(code, other.to_string(), None),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ServiceError::Validation(msg) => ApiError::invalid(msg),
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => ApiError::invalid(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e.code() {
            code::UNAUTHORIZED => {
                warn!(reason = %e, "authentication failed");
                ApiError::Unauthorized(e.to_string())
            }
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

/// `{field: message}` for the first message of every failing field.
impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        let mut data = Map::new();
        for (field, errors) in e.field_errors() {
            let message = errors
                .first()
                .and_then(|err| err.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid."));
            data.insert(camel_case(&field), Value::String(message));
        }
        ApiError::InvalidArgument { message: INVALID_ARGUMENTS.to_string(), data: Some(Value::Object(data)) }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self { ApiError::invalid(e.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self { ApiError::invalid(e.body_text()) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
