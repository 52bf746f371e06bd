use thiserror::Error;

use crate::application::ports::payment_provider::VerificationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Webhook Error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unhandled relevant event: {0}")]
    UnhandledEvent(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Payment provider error: {0}")]
    Upstream(String),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the payment provider should redeliver the event.
    ///
    /// Transient collaborator failures are retryable; problems with the
    /// request itself will not change on redelivery.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Database(_)
            | AppError::Upstream(_)
            | AppError::EmailDelivery(_)
            | AppError::Internal(_) => true,

            AppError::Verification(_) | AppError::InvalidInput(_) | AppError::UnhandledEvent(_) => {
                false
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Verification(_) => ErrorCode::VerificationFailed,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::UnhandledEvent(_) => ErrorCode::UnhandledEvent,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Upstream(_) => ErrorCode::UpstreamError,
            AppError::EmailDelivery(_) => ErrorCode::EmailDeliveryFailed,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    VerificationFailed,
    InvalidInput,
    UnhandledEvent,
    DatabaseError,
    UpstreamError,
    EmailDeliveryFailed,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::VerificationFailed => "VERIFICATION_FAILED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::UnhandledEvent => "UNHANDLED_EVENT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::EmailDeliveryFailed => "EMAIL_DELIVERY_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
