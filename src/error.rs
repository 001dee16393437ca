// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact intake pipeline.

use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failure outcomes of a contact submission.
///
/// The display text of each variant is the message returned to the client.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Too many requests. Please wait a moment.")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cause is kept for logs and never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

/// Result of [`crate::intake::ContactIntake::submit`].
pub type SubmissionResult = std::result::Result<(), IntakeError>;

impl IntakeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        match self {
            Self::RateLimited { retry_after } => {
                // Round up so clients never retry inside the window
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_message_mapping() {
        let cases = [
            (
                IntakeError::RateLimited { retry_after: Duration::from_secs(5) },
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please wait a moment.",
            ),
            (
                IntakeError::from(ValidationError::MissingFields { fields: vec!["email"] }),
                StatusCode::BAD_REQUEST,
                "Missing required fields",
            ),
            (
                IntakeError::from(ValidationError::InvalidEmail),
                StatusCode::BAD_REQUEST,
                "Invalid email format",
            ),
            (
                IntakeError::Internal("smtp relay refused connection".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        ];

        for (err, status, message) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = IntakeError::RateLimited {
            retry_after: Duration::from_millis(1_500),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }
}
