use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use chrono::{TimeZone, Utc};

use quill_core::domain::{Comment, Post, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};

use crate::database::entity::{comment, post, tag};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};

#[tokio::test]
async fn test_find_tag_by_slug() {
    let tag_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![tag::Model {
            id: tag_id,
            name: "Rust".to_owned(),
            slug: "rust".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let found: Tag = repo.find_by_slug("rust").await.unwrap().unwrap();

    assert_eq!(found.id, tag_id);
    assert_eq!(found.name, "Rust");
}

#[tokio::test]
async fn test_save_tag_upserts_and_returns_row() {
    let tag = Tag::new("Web Dev");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![tag::Model {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let saved: Tag = repo.save(tag.clone()).await.unwrap();

    assert_eq!(saved, tag);
    assert_eq!(saved.slug, "web-dev");
}

#[tokio::test]
async fn test_find_active_comments() {
    let post_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: Uuid::new_v4(),
            post_id,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Nice post".to_owned(),
            active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments: Vec<Comment> = repo.find_active_by_post(post_id).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].post_id, post_id);
    assert!(comments[0].active);
}

#[tokio::test]
async fn test_find_missing_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.find_by_id(Uuid::new_v4()).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_similar_candidates_without_tags_skip_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo
        .find_published_with_any_tag(&[], Uuid::new_v4())
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_save_post_rejects_slug_taken_on_same_day() {
    let author = Uuid::new_v4();
    let morning = Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 5, 17, 18, 0, 0).unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: Uuid::new_v4(),
            author_id: author,
            title: "Hello".to_owned(),
            slug: "hello".to_owned(),
            body: "first".to_owned(),
            status: post::Status::Published,
            publish: morning.into(),
            created_at: morning.into(),
            updated_at: morning.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = repo
        .save(Post::new(author, "Hello", "second").published_at(evening))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}
