use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Every query returns posts with their tags loaded and
/// ordered by publish date, newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Published posts, optionally restricted to those carrying `tag_id`.
    async fn find_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError>;

    /// Published posts with the given slug whose publish date (UTC) is `date`.
    async fn find_published_on(&self, date: NaiveDate, slug: &str)
    -> Result<Vec<Post>, RepoError>;

    /// Published posts other than `exclude` carrying at least one of `tag_ids`.
    async fn find_published_with_any_tag(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Number of comments (active or not) stored for a post.
    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// User repository. Authors are only looked up by id.
pub trait UserRepository: BaseRepository<User, Uuid> {}

/// Store handles injected into the services.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
}
