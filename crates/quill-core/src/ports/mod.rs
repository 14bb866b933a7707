//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod mailer;
mod repository;
mod validation;

pub use mailer::{MailError, Mailer, OutgoingMail};
pub use repository::{
    BaseRepository, CommentRepository, PostRepository, Repositories, TagRepository,
    UserRepository,
};
pub use validation::FormValidator;
