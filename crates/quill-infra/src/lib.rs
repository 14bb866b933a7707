//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, mail and form validation adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `smtp` - SMTP delivery via lettre

pub mod database;
pub mod mail;
pub mod validation;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, in_memory_repositories};
pub use mail::{InMemoryMailer, LogMailer, MailConfig};
pub use validation::StandardFormValidator;

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::{connect, postgres_repositories};
#[cfg(feature = "smtp")]
pub use mail::SmtpMailer;
