use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::errors::PayoutError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// HTTP boundary for handler errors. Balance-check and state-machine
/// conflicts map to 409 so callers can tell a benign race from a bad
/// request; internal detail never leaves the process on 500s.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Payout(#[from] PayoutError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Payout(err) => {
                let status = match err {
                    PayoutError::InvalidAmount | PayoutError::BelowMinimum { .. } => {
                        StatusCode::BAD_REQUEST
                    }
                    PayoutError::NotFound => StatusCode::NOT_FOUND,
                    PayoutError::AlreadyProcessed
                    | PayoutError::InsufficientAvailable
                    | PayoutError::StillLocked(_) => StatusCode::CONFLICT,
                    PayoutError::InsufficientLocked | PayoutError::Internal(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };

                let message = match err {
                    // Don't leak internal error detail to the client
                    PayoutError::Internal(_) => "Internal server error".to_string(),
                    other => other.to_string(),
                };

                (status, message)
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
