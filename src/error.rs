use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::services::selection::SelectionError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Payment failed: {0}")]
    Payment(String),
    #[error("Payment captured but slots could not be committed (booking {booking_id}, provider ref {provider_ref})")]
    Reconciliation { booking_id: String, provider_ref: String },
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Selection(sel) => {
                let status = if sel.is_conflict() { StatusCode::CONFLICT } else { StatusCode::BAD_REQUEST };
                (status, sel.to_string())
            }
            AppError::Payment(msg) => (StatusCode::PAYMENT_REQUIRED, format!("Payment failed: {}", msg)),
            AppError::Reconciliation { booking_id, provider_ref } => {
                // Money moved but the slots did not. Must reach support, never be retried blindly.
                error!(
                    booking_id = %booking_id,
                    provider_ref = %provider_ref,
                    "RECONCILIATION REQUIRED: payment captured but slot commit conflicted"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "Payment was captured but the slots are no longer available. Contact support with booking id {}",
                        booking_id
                    ),
                )
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
