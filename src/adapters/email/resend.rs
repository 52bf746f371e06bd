use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::email_sender::{EmailReceipt, EmailSender, OutgoingEmail},
};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

pub struct ResendEmailSender {
    client: Client,
    api_key: SecretString,
}

impl ResendEmailSender {
    pub fn new(client: Client, api_key: SecretString) -> Self {
        Self { client, api_key }
    }
}

#[derive(Serialize)]
struct ResendReq<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl<'a> From<&'a OutgoingEmail> for ResendReq<'a> {
    fn from(email: &'a OutgoingEmail) -> Self {
        Self {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        }
    }
}

#[derive(Deserialize)]
struct ResendResp {
    id: String,
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<EmailReceipt> {
        let resp: ResendResp = self
            .client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&ResendReq::from(email))
            .send()
            .await
            .map_err(|e| AppError::EmailDelivery(format!("Failed to send email: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::EmailDelivery(format!("Email API error: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::EmailDelivery(format!("Unexpected email API response: {e}")))?;

        Ok(EmailReceipt { id: resp.id })
    }
}
