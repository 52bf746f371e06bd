use async_trait::async_trait;
use serde::Serialize;

use crate::app_error::AppResult;

/// A fully rendered transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReceipt {
    pub id: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Failures must be reported as `AppError::EmailDelivery`.
    async fn send(&self, email: &OutgoingEmail) -> AppResult<EmailReceipt>;
}
