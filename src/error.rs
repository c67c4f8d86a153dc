use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// ApiError
///
/// The error taxonomy shared by every handler and the repository layer.
/// Each variant maps to a stable machine-readable `kind` plus an HTTP status,
/// so clients can branch on the kind without parsing the human message.
///
/// None of these are fatal to the process: store failures arrive as
/// `Internal` and propagate opaquely, everything else is a normal
/// client-visible outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist (or is not visible).
    #[error("Resource not found.")]
    NotFound,

    /// No actor could be resolved for the request (missing/invalid token).
    /// Distinct from `Forbidden`: here the caller is unknown, not denied.
    #[error("Authentication required.")]
    Unauthenticated,

    /// The policy engine denied the action for a resolved actor.
    #[error("Permission denied.")]
    Forbidden,

    /// A field-level validation failure. Carries the offending field so the
    /// client can attach the message to the right input.
    #[error("{reason}")]
    Validation { field: &'static str, reason: String },

    /// A uniqueness violation: duplicate like, duplicate title/slug,
    /// duplicate username.
    #[error("{0}")]
    Conflict(String),

    /// Surfaced on behalf of the rate-limiting layer; the core itself never
    /// produces this.
    #[error("Request was throttled.")]
    RateLimited,

    /// Opaque infrastructure failure (store, token signing). The message is
    /// logged, never sent to clients.
    #[error("Internal server error.")]
    Internal(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    /// Stable machine-readable discriminator for the JSON body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound => "not_found",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden => "forbidden",
            ApiError::Validation { .. } => "validation_failed",
            ApiError::Conflict(_) => "conflict",
            ApiError::RateLimited => "rate_limited",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// ErrorBody
///
/// Wire shape of every error response: `{"error": "...", "kind": "..."}`,
/// plus `field` for validation failures.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!("internal error: {}", e);
        }

        let field = match &self {
            ApiError::Validation { field, .. } => Some(*field),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            field,
        };

        (self.status(), Json(body)).into_response()
    }
}
