//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the blog's business rules (post queries, similar-post
//! ranking, pagination, comment and share handling) with zero infrastructure
//! dependencies. Storage, mail and validation are reached through the traits
//! in [`ports`].

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::{BlogService, BlogSettings};
