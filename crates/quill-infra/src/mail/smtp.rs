//! SMTP mail transport via lettre.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use quill_core::ports::{MailError, Mailer, OutgoingMail};

use super::MailConfig;

/// Async SMTP mailer. Without a configured host it runs in no-op mode and
/// only logs what would have been sent.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = if config.smtp_host.trim().is_empty() {
            tracing::warn!("SMTP host not configured; mailer will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.smtp_port);

            let builder = match (&config.smtp_username, &config.smtp_password) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password.clone()))
                }
                _ => builder,
            };

            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport configured");
            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport })
    }

    /// A mailer in no-op mode regardless of configuration.
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::Address(format!("{address}: {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            tracing::info!(
                subject = %mail.subject,
                recipients = mail.to.len(),
                "Mailer running in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let mut builder = Message::builder()
            .from(mailbox(&mail.from)?)
            .subject(mail.subject.as_str())
            .header(header::ContentType::TEXT_PLAIN);
        for to in &mail.to {
            builder = builder.to(mailbox(to)?);
        }

        let message = builder
            .body(mail.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(subject = %mail.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_op_mode_accepts_mail() {
        let mailer = SmtpMailer::new(&MailConfig::default()).unwrap();
        assert!(!mailer.is_enabled());

        let result = mailer
            .send(OutgoingMail {
                subject: "hi".into(),
                body: "body".into(),
                from: "admin@myblog.com".into(),
                to: vec!["bob@example.com".into()],
            })
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_disabled_mailer_has_no_transport() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".into(),
            ..MailConfig::default()
        };
        assert!(SmtpMailer::new(&config).is_ok_and(|m| m.is_enabled()));
        assert!(!SmtpMailer::disabled().is_enabled());
    }

    #[test]
    fn test_invalid_mailbox() {
        assert!(matches!(mailbox("nope"), Err(MailError::Address(_))));
    }
}
