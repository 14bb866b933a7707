//! SeaORM entities backing the repositories.

pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;
