//! In-memory repositories - used when no database is configured and in tests.
//!
//! Note: Data is lost on process restart.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, Repositories, TagRepository,
    UserRepository,
};

/// Entities the in-memory store can key by id.
pub trait Keyed {
    fn key(&self) -> Uuid;

    /// Describes the unique value `self` would duplicate in `other`, if any.
    fn conflict(&self, _other: &Self) -> Option<String> {
        None
    }
}

impl Keyed for Post {
    fn key(&self) -> Uuid {
        self.id
    }

    fn conflict(&self, other: &Self) -> Option<String> {
        (self.slug == other.slug && self.publish_date() == other.publish_date())
            .then(|| format!("slug '{}' already used on {}", self.slug, self.publish_date()))
    }
}

impl Keyed for Tag {
    fn key(&self) -> Uuid {
        self.id
    }

    fn conflict(&self, other: &Self) -> Option<String> {
        (self.slug == other.slug).then(|| format!("tag slug '{}' already exists", self.slug))
    }
}

impl Keyed for Comment {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for User {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Generic in-memory repository keeping rows in insertion order behind an
/// async `RwLock`.
pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> InMemoryRepository<T> {
    async fn select(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let rows = self.rows.read().await;
        rows.iter().filter(|r| pred(r)).cloned().collect()
    }
}

/// In-memory post repository.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

/// In-memory tag repository.
pub type InMemoryTagRepository = InMemoryRepository<Tag>;

/// In-memory comment repository.
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

#[async_trait]
impl<T> BaseRepository<T, Uuid> for InMemoryRepository<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.key() == id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if let Some(message) = rows
            .iter()
            .filter(|r| r.key() != entity.key())
            .find_map(|r| entity.conflict(r))
        {
            return Err(RepoError::Constraint(message));
        }
        match rows.iter_mut().find(|r| r.key() == entity.key()) {
            Some(existing) => *existing = entity.clone(),
            None => rows.push(entity.clone()),
        }
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.key() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by_key(|p| Reverse(p.publish));
    posts
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .select(|p| p.is_published() && tag_id.is_none_or(|id| p.has_tag(id)))
            .await;
        Ok(newest_first(posts))
    }

    async fn find_published_on(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .select(|p| p.is_published() && p.slug == slug && p.publish_date() == date)
            .await;
        Ok(newest_first(posts))
    }

    async fn find_published_with_any_tag(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .select(|p| {
                p.is_published() && p.id != exclude && tag_ids.iter().any(|id| p.has_tag(*id))
            })
            .await;
        Ok(newest_first(posts))
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self.select(|t| t.slug == slug).await.into_iter().next())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self.select(|c| c.post_id == post_id && c.active).await;
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.select(|c| c.post_id == post_id).await.len() as u64)
    }
}

impl UserRepository for InMemoryUserRepository {}

/// A full set of empty in-memory repositories.
pub fn in_memory_repositories() -> Repositories {
    Repositories {
        posts: std::sync::Arc::new(InMemoryPostRepository::new()),
        tags: std::sync::Arc::new(InMemoryTagRepository::new()),
        comments: std::sync::Arc::new(InMemoryCommentRepository::new()),
        users: std::sync::Arc::new(InMemoryUserRepository::new()),
    }
}
