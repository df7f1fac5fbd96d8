//! Canned email over SMTP with STARTTLS.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use jarvis_core::config::{secret_from_env, EmailConfig};

use super::Mailer;
use crate::error::ActionError;

/// Sends the configured message from `sender` to `recipient`.
///
/// The SMTP password is read from the environment on every send so it
/// never lives in the config file.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn password(&self) -> Option<String> {
        secret_from_env(&self.config.password_env)
    }

    fn build_message(&self) -> Result<Message, ActionError> {
        let from = self
            .config
            .sender
            .parse()
            .map_err(|e| ActionError::InvalidAddress(format!("sender: {}", e)))?;
        let to = self
            .config
            .recipient
            .parse()
            .map_err(|e| ActionError::InvalidAddress(format!("recipient: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.config.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.config.body.clone())
            .map_err(|e| ActionError::Mail(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self) -> Result<(), ActionError> {
        let Some(password) = self.password() else {
            return Err(ActionError::NotConfigured(format!(
                "SMTP password ({} is unset)",
                self.config.password_env
            )));
        };

        let message = self.build_message()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| ActionError::Mail(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(self.config.sender.clone(), password))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| ActionError::Mail(e.to_string()))?;

        tracing::info!(
            host = %self.config.smtp_host,
            recipient = %self.config.recipient,
            "Email sent"
        );
        Ok(())
    }
}
