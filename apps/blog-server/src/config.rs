//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_core::BlogSettings;
use quill_infra::{DatabaseConfig, MailConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Absolute base URL used for links in mail and the sitemap.
    /// Falls back to the request's scheme and host when unset.
    pub site_url: Option<String>,
    pub database: Option<DatabaseConfig>,
    pub mail: MailConfig,
    pub blog: BlogSettings,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parsed("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parsed("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        let defaults = BlogSettings::default();
        let blog = BlogSettings {
            posts_per_page: parsed("POSTS_PER_PAGE", defaults.posts_per_page).max(1),
            comments_per_page: parsed("COMMENTS_PER_PAGE", defaults.comments_per_page).max(1),
            similar_posts_limit: parsed("SIMILAR_POSTS_LIMIT", defaults.similar_posts_limit),
            mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            site_url: env::var("SITE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            database,
            mail: MailConfig::from_env(),
            blog,
        }
    }
}
