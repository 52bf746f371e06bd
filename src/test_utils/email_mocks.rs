//! In-memory email sender.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::email_sender::{EmailReceipt, EmailSender, OutgoingEmail},
};

/// Captures delivered emails. A failing sender counts attempts but
/// captures nothing.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: Mutex<usize>,
    fail: bool,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn captured_emails(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<EmailReceipt> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(AppError::EmailDelivery("provider unavailable".to_string()));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(EmailReceipt {
            id: format!("email_{}", sent.len()),
        })
    }
}
