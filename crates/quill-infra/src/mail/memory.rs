//! In-memory mailer - records every message instead of delivering it.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{MailError, Mailer, OutgoingMail};

/// Outbox mailer for tests. Keeps every message, so never wire it into a server.
#[derive(Default)]
pub struct InMemoryMailer {
    outbox: RwLock<Vec<OutgoingMail>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn outbox(&self) -> Vec<OutgoingMail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::debug!(subject = %mail.subject, "Mail captured in outbox");
        self.outbox.write().await.push(mail);
        Ok(())
    }
}
