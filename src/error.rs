use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payment API error: {0}")]
    PaymentApi(String),

    #[error("Email service error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fixed response strings for the webhook pipeline. Providers key their
/// retry behavior off these responses, so the wording is part of the contract.
pub mod msg {
    pub const EMPTY_BODY: &str = "Request body is empty.";
    pub const INVALID_JSON: &str = "Invalid JSON format.";
    pub const NOT_APPROVED: &str =
        "Notification received but not processed (status not approved).";
    pub const MP_NO_DATA_ID: &str = "MP notification ignored (no data ID).";
    pub const ALREADY_EXISTS: &str = "User already exists. No new action was taken.";
    pub const PROCESSED: &str = "Webhook processed successfully.";
    pub const PROVISION_FAILED: &str = "Internal error while processing user or sending email.";
    pub const CRITICAL_FAILURE: &str = "Critical failure to process notification.";

    pub const GATE_NOT_APPROVED: &str = "Notification status is not an approved payment.";
    pub const GATE_NO_EMAIL: &str = "No customer email could be extracted from the notification.";

    pub const EMAIL_EMPTY: &str = "Email cannot be empty";
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";
    pub const NAME_EMPTY: &str = "Name cannot be empty";
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server misconfigured",
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (StatusCode::BAD_REQUEST, "Invalid JSON", Some(e.to_string()))
            }
            AppError::PaymentApi(msg) => {
                tracing::error!("Payment API error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Payment provider error",
                    Some(msg.clone()),
                )
            }
            AppError::Email(msg) => {
                tracing::error!("Email service error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Email service error",
                    Some(msg.clone()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
