//! Outgoing mail transport.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use socialhub_common::{config::MailConfig, AppError, AppResult};

/// SMTP mailer.
///
/// When no mail configuration is present the mailer is disabled and messages
/// are logged at debug level instead of being delivered.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl Mailer {
    /// Build a mailer from optional SMTP configuration.
    pub fn new(config: Option<&MailConfig>) -> AppResult<Self> {
        let Some(config) = config else {
            return Ok(Self {
                transport: None,
                from: None,
            });
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Config(format!("invalid SMTP host: {e}")))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("invalid from address: {e}")))?;

        Ok(Self {
            transport: Some(builder.build()),
            from: Some(from),
        })
    }

    /// A mailer that never delivers. Used in tests and when mail is off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            transport: None,
            from: None,
        }
    }

    /// Whether a transport is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a plain-text message.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            tracing::debug!(to, subject, "Mail transport disabled, skipping delivery");
            return Ok(());
        };

        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::BadRequest(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP delivery failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_mailer() {
        let mailer = Mailer::disabled();
        assert!(!mailer.is_enabled());
    }

    #[test]
    fn test_new_without_config_is_disabled() {
        let mailer = Mailer::new(None).unwrap();
        assert!(!mailer.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_send_is_noop() {
        let mailer = Mailer::disabled();
        let result = mailer.send("a@example.com", "hi", "body").await;
        assert!(result.is_ok());
    }
}
