//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{Mailer, Repositories};
use quill_core::BlogService;
use quill_infra::{DatabaseConfig, MailConfig, StandardFormValidator, in_memory_repositories};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    /// Configured absolute base URL, without a trailing slash.
    pub site_url: Option<String>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = init_repositories(config.database.as_ref()).await;
        let mailer = init_mailer(&config.mail);

        let blog = BlogService::new(
            repos,
            mailer,
            Arc::new(StandardFormValidator::new()),
            config.blog.clone(),
        );

        tracing::info!("Application state initialized");

        Self::from_service(blog, config.site_url.clone())
    }

    pub fn from_service(blog: BlogService, site_url: Option<String>) -> Self {
        Self {
            blog: Arc::new(blog),
            site_url,
        }
    }
}

#[cfg(feature = "postgres")]
async fn init_repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    match quill_infra::connect(config).await {
        Ok(conn) => quill_infra::postgres_repositories(conn),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory_repositories()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn init_repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}

#[cfg(feature = "smtp")]
fn init_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    match quill_infra::SmtpMailer::new(config) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!("Failed to configure SMTP: {}. Mail will be logged, not sent.", e);
            Arc::new(quill_infra::SmtpMailer::disabled())
        }
    }
}

#[cfg(not(feature = "smtp"))]
fn init_mailer(_config: &MailConfig) -> Arc<dyn Mailer> {
    tracing::info!("Running without smtp feature - mail will be logged, not sent");
    Arc::new(quill_infra::LogMailer::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ports::OutgoingMail;

    fn mail(n: usize) -> OutgoingMail {
        OutgoingMail {
            subject: format!("share {n}"),
            body: "body".into(),
            from: "admin@myblog.com".into(),
            to: vec!["bob@example.com".into()],
        }
    }

    #[actix_web::test]
    async fn test_unconfigured_mailer_accepts_mail() {
        let mailer = init_mailer(&MailConfig::default());
        for n in 0..3 {
            assert!(mailer.send(mail(n)).await.is_ok());
        }
    }
}
