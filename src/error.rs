//! Error handling

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the detection pipeline itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("No file was provided for analysis")]
    MissingFile,

    #[error("Unsupported media type '{mime}'. Supported: video/*, image/*, audio/*")]
    UnsupportedMedia { mime: String },

    #[error("An analysis is already in progress for this session")]
    AnalysisInProgress,

    #[error("No analysis is currently in progress")]
    NoActiveAnalysis,
}

#[derive(Debug)]
pub enum AppError {
    // Auth errors
    InvalidCredentials,
    SessionExpired,
    Unauthorized,
    Forbidden,

    // Resource errors
    NotFound(String),
    AlreadyExists(String),

    // Field-level validation errors
    Validation(BTreeMap<String, String>),

    // Detection pipeline errors
    Detect(DetectError),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }
            AppError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, "Session has expired".to_string())
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(fields) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "fields": fields,
                    "status": StatusCode::BAD_REQUEST.as_u16()
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Detect(err) => {
                let status = match err {
                    DetectError::MissingFile => StatusCode::BAD_REQUEST,
                    DetectError::UnsupportedMedia { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    DetectError::AnalysisInProgress | DetectError::NoActiveAnalysis => {
                        StatusCode::CONFLICT
                    }
                };
                (status, err.to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<DetectError> for AppError {
    fn from(err: DetectError) -> Self {
        AppError::Detect(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| err.code.to_string());
                fields.insert(field.to_string(), message);
            }
        }
        AppError::Validation(fields)
    }
}
