use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::{Json, http::StatusCode, response::IntoResponse};
use diesel_async::pooled_connection::deadpool::PoolError;
use serde::Serialize;
use serde_json::Value;

/// Failures coming out of the persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("could not get a pooled connection: {0}")]
    Pool(#[from] PoolError),
}

/// Errors surfaced to API clients.
///
/// Domain failures carry a kind and an optional reason payload (a plain
/// string or a structured object). Anything else coming from the store is
/// wrapped into [`AppError::Internal`], keeping the original cause.
#[derive(thiserror::Error, Debug, Clone)]
pub enum AppError {
    #[error("Not found")]
    NotFound { reason: Option<Value> },

    #[error("Forbidden")]
    Forbidden { reason: Option<Value> },

    #[error("Invalid Author ID")]
    AuthorNotFound,

    #[error("Database error: {0}")]
    Internal(#[source] Arc<StoreError>),

    #[error("{0}")]
    Unhandled(String),
}

impl AppError {
    pub fn not_found(reason: impl Into<Value>) -> Self {
        AppError::NotFound {
            reason: Some(reason.into()),
        }
    }

    pub fn forbidden(reason: impl Into<Value>) -> Self {
        AppError::Forbidden {
            reason: Some(reason.into()),
        }
    }

    /// Wire code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } | AppError::AuthorNotFound => "NOT_FOUND",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::Internal(_) | AppError::Unhandled(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn reason(&self) -> Option<Value> {
        match self {
            AppError::NotFound { reason } | AppError::Forbidden { reason } => reason.clone(),
            AppError::AuthorNotFound => Some(Value::from("Invalid Author ID")),
            AppError::Internal(_) | AppError::Unhandled(_) => None,
        }
    }

    /// Client-facing message. Store failures are masked outside debug builds.
    fn message(&self) -> String {
        match self {
            #[cfg(not(debug_assertions))]
            AppError::Internal(_) => "Internal server error".into(),
            e => e.to_string(),
        }
    }

    #[cfg(debug_assertions)]
    fn cause(&self) -> Option<String> {
        match self {
            AppError::Internal(e) => Some(format!("{e:?}")),
            _ => None,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } | AppError::AuthorNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Internal(_) | AppError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Store operation failed");
        AppError::Internal(Arc::new(e))
    }
}

impl From<&'static str> for AppError {
    fn from(e: &'static str) -> Self {
        AppError::Unhandled(e.into())
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.message()).extend_with(|_, e| {
            e.set("code", self.code());
            #[cfg(debug_assertions)]
            if let Some(cause) = self.cause() {
                e.set("cause", cause);
            }
            if let Some(reason) = self.reason() {
                match async_graphql::Value::from_json(reason) {
                    Ok(reason) => e.set("reason", reason),
                    Err(error) => tracing::warn!(%error, "Dropping unrepresentable error reason"),
                }
            }
        })
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Value>,

    #[cfg(debug_assertions)]
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let error_response = ErrorResponse {
            code: self.code(),
            msg: Some(self.message()),
            reason: self.reason(),
            #[cfg(debug_assertions)]
            cause: self.cause(),
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}
