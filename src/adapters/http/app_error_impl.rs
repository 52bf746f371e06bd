use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        if self.is_retryable() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let code = self.code();
        match self {
            AppError::Verification(reason) => error_resp(
                StatusCode::BAD_REQUEST,
                code,
                Some(format!("Webhook Error: {reason}")),
            ),
            AppError::InvalidInput(msg) | AppError::UnhandledEvent(msg) => {
                error_resp(StatusCode::BAD_REQUEST, code, Some(msg))
            }
            AppError::Database(_) | AppError::Upstream(_) | AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                Some("Webhook handler failed.".into()),
            ),
            AppError::EmailDelivery(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                Some("Failed to send email.".into()),
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
