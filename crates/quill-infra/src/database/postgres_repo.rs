//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, Repositories, TagRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity, Status};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{
    PostgresBaseRepository, query_error, upsert_on_primary_key, write_error,
};

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// All repositories sharing one connection pool.
pub fn postgres_repositories(db: DbConn) -> Repositories {
    Repositories {
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        tags: Arc::new(PostgresTagRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
        users: Arc::new(PostgresUserRepository::new(db)),
    }
}

/// Half-open UTC bounds `[start, end)` of a calendar day.
fn utc_day(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date.and_hms_opt(0, 0, 0)?.and_utc();
    let end = start.checked_add_days(Days::new(1))?;
    Some((start, end))
}

/// PostgreSQL post repository.
///
/// Posts carry their tags, so saving also rewrites the `post_tags` rows in the
/// same transaction and every query loads tags in one extra round trip.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn with_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .find_also_related(TagEntity)
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (link, tag) in rows {
            if let Some(tag) = tag {
                tags_by_post.entry(link.post_id).or_default().push(tag.into());
            }
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let tags = tags_by_post.remove(&m.id).unwrap_or_default();
                m.into_domain(tags)
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        match model {
            Some(model) => Ok(self.with_tags(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let post_id = entity.id;
        let date = entity.publish_date();

        if let Some((start, end)) = utc_day(date) {
            let taken = PostEntity::find()
                .filter(post::Column::Slug.eq(entity.slug.as_str()))
                .filter(post::Column::Publish.gte(start))
                .filter(post::Column::Publish.lt(end))
                .filter(post::Column::Id.ne(post_id))
                .one(&self.db)
                .await
                .map_err(query_error)?;
            if taken.is_some() {
                return Err(RepoError::Constraint(format!(
                    "slug '{}' already used on {}",
                    entity.slug, date
                )));
            }
        }

        let tags = entity.tags.clone();
        let links: Vec<post_tag::ActiveModel> = tags
            .iter()
            .map(|t| post_tag::ActiveModel {
                post_id: sea_orm::Set(post_id),
                tag_id: sea_orm::Set(t.id),
            })
            .collect();

        let txn = self.db.begin().await.map_err(query_error)?;

        let model = PostEntity::insert(post::ActiveModel::from(entity))
            .on_conflict(upsert_on_primary_key::<PostEntity>())
            .exec_with_returning(&txn)
            .await
            .map_err(write_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if !links.is_empty() {
            PostTagEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;

        tracing::debug!(post_id = %post_id, tags = tags.len(), "Post saved");
        Ok(model.into_domain(tags))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Status.eq(Status::Published));

        if let Some(tag_id) = tag_id {
            query = query.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }

        let models = query
            .order_by_desc(post::Column::Publish)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn find_published_on(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let Some((start, end)) = utc_day(date) else {
            return Ok(Vec::new());
        };

        let models = PostEntity::find()
            .filter(post::Column::Status.eq(Status::Published))
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .order_by_desc(post::Column::Publish)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn find_published_with_any_tag(
        &self,
        tag_ids: &[Uuid],
        exclude: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = PostEntity::find()
            .filter(post::Column::Status.eq(Status::Published))
            .filter(post::Column::Id.ne(exclude))
            .filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.is_in(tag_ids.iter().copied()))
                        .to_owned(),
                ),
            )
            .order_by_desc(post::Column::Publish)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        tracing::debug!(slug, "Finding tag by slug");

        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        use sea_orm::PaginatorTrait;

        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}

impl UserRepository for PostgresUserRepository {}
