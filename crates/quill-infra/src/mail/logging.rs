//! Mailer that only logs outgoing mail.

use async_trait::async_trait;

use quill_core::ports::{MailError, Mailer, OutgoingMail};

/// Logs each message instead of delivering it. Holds nothing in memory.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            subject = %mail.subject,
            from = %mail.from,
            recipients = mail.to.len(),
            "Mail delivery disabled; message logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_mail() {
        let mailer = LogMailer::new();
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
}
