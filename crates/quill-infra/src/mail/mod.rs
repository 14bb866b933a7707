//! Mail transports - SMTP, a logging fallback and an in-memory outbox for tests.

mod logging;
mod memory;
#[cfg(feature = "smtp")]
mod smtp;

pub use logging::LogMailer;
pub use memory::InMemoryMailer;
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;

/// SMTP settings. An empty `smtp_host` means no-op mode: mail is logged, not sent.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub use_starttls: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            use_starttls: true,
        }
    }
}

impl MailConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smtp_port),
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            use_starttls: std::env::var("SMTP_STARTTLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.use_starttls),
        }
    }
}
