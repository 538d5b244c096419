//! SMTP mail delivery. Callers treat delivery as best-effort; failures
//! here are logged and swallowed by the triggering operation.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use sawaari_core::notify::{Mailer, Notification};
use sawaari_core::{Error, Result};

use crate::app_config::MailConfig;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Build from configuration. Returns `None` when no SMTP host is
    /// configured, signalling the caller to fall back to the log-only
    /// mailer.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>> {
        let Some(host) = &config.smtp_host else {
            return Ok(None);
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| Error::Mail(format!("SMTP relay setup failed: {}", e)))?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Some(Self {
            transport: builder.build(),
            from: config.from.clone(),
        }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: Notification) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| Error::Mail(format!("Bad sender address: {}", e)))?,
            )
            .to(notification
                .to
                .parse()
                .map_err(|e| Error::Mail(format!("Bad recipient address: {}", e)))?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body)
            .map_err(|e| Error::Mail(format!("Message build failed: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Mail(format!("SMTP send failed: {}", e)))?;

        tracing::info!(to = %notification.to, subject = %notification.subject, "Notification email sent");
        Ok(())
    }
}
