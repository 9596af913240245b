//! Error handling for the Blood Donor Registry API
//!
//! Every error becomes a JSON body of the form `{"error": "..."}`

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorBody;
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation { field, message } => ErrorBody {
                error: message.clone(),
                field: Some(field.clone()),
            },
            AppError::MalformedRequest(msg) => ErrorBody {
                error: msg.clone(),
                field: None,
            },
            AppError::NotFound(resource) => ErrorBody {
                error: format!("{} not found", resource),
                field: None,
            },
            // Store details stay in the log
            AppError::Store(_) => ErrorBody {
                error: "A database error occurred".to_string(),
                field: None,
            },
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(name, _)| *name);

        let Some((name, field_errors)) = fields.into_iter().next() else {
            return AppError::MalformedRequest("Invalid donor".to_string());
        };
        let first = field_errors.first();

        // Struct-level checks report under "__all__" with the real field as code
        let field = to_camel_case(match (name, first) {
            ("__all__", Some(err)) => &*err.code,
            _ => name,
        });
        let message = first
            .and_then(|err| err.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid value for {}", field));

        AppError::Validation { field, message }
    }
}

/// Rust field names to wire field names
fn to_camel_case(field: &str) -> String {
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

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
