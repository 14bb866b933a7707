//! Application services - the blog's use cases built on the ports.

mod blog;
pub mod pagination;
pub mod share;
pub mod similarity;
pub mod sitemap;

pub use blog::{
    BlogService, BlogSettings, CommentSubmission, PostDetail, PostListing, ShareOutcome,
};
pub use pagination::{Page, paginate};
