//! BlogService behavior against the in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use quill_core::domain::{Post, Tag};
use quill_core::forms::{CommentForm, EmailPostForm};
use quill_core::ports::{BaseRepository, CommentRepository, Repositories};
use quill_core::services::{CommentSubmission, ShareOutcome};
use quill_core::error::RepoError;
use quill_core::{BlogService, BlogSettings, DomainError};
use quill_infra::{InMemoryMailer, StandardFormValidator, in_memory_repositories};

struct Fixture {
    service: BlogService,
    repos: Repositories,
    mailer: Arc<InMemoryMailer>,
    author: Uuid,
}

fn fixture() -> Fixture {
    let repos = in_memory_repositories();
    let mailer = Arc::new(InMemoryMailer::new());
    let service = BlogService::new(
        repos.clone(),
        mailer.clone(),
        Arc::new(StandardFormValidator::new()),
        BlogSettings::default(),
    );
    Fixture {
        service,
        repos,
        mailer,
        author: Uuid::new_v4(),
    }
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

impl Fixture {
    async fn tag(&self, name: &str) -> Tag {
        self.repos.tags.save(Tag::new(name)).await.unwrap()
    }

    async fn publish(&self, title: &str, tags: &[&Tag], at: DateTime<Utc>) -> Post {
        let post = Post::new(self.author, title, "body")
            .with_tags(tags.iter().map(|t| (*t).clone()).collect())
            .published_at(at);
        self.repos.posts.save(post).await.unwrap()
    }

    async fn draft(&self, title: &str, tags: &[&Tag]) -> Post {
        let mut post = Post::new(self.author, title, "body")
            .with_tags(tags.iter().map(|t| (*t).clone()).collect());
        post.publish = day(2024, 5, 17);
        self.repos.posts.save(post).await.unwrap()
    }
}

fn valid_comment() -> CommentForm {
    CommentForm {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        body: "Great read".into(),
    }
}

#[tokio::test]
async fn list_published_hides_drafts_and_filters_by_tag() {
    let fx = fixture();
    let rust = fx.tag("rust").await;
    fx.publish("Tagged", &[&rust], day(2024, 1, 1)).await;
    fx.publish("Untagged", &[], day(2024, 2, 1)).await;
    fx.draft("Draft", &[&rust]).await;

    let (all, tag) = fx.service.list_published(None).await.unwrap();
    let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Untagged", "Tagged"]);
    assert!(tag.is_none());

    let (tagged, tag) = fx.service.list_published(Some("rust")).await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].title, "Tagged");
    assert_eq!(tag.unwrap().id, rust.id);
}

#[tokio::test]
async fn unknown_tag_is_not_found() {
    let fx = fixture();
    let err = fx.service.list_published(Some("nope")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Tag", .. }));
}

#[tokio::test]
async fn list_posts_normalizes_page_tokens() {
    let fx = fixture();
    for i in 1..=7 {
        fx.publish(&format!("Post {i}"), &[], day(2024, 1, i)).await;
    }

    let first = fx.service.list_posts(None, Some("abc")).await.unwrap();
    assert_eq!(first.posts.number, 1);
    assert_eq!(first.posts.items[0].title, "Post 7");

    let last = fx.service.list_posts(None, Some("42")).await.unwrap();
    assert_eq!(last.posts.number, 3);
    assert_eq!(last.posts.items.len(), 1);
    assert_eq!(last.posts.items[0].title, "Post 1");
}

#[tokio::test]
async fn detail_requires_matching_date_and_published_status() {
    let fx = fixture();
    let post = fx.publish("Hello World", &[], day(2024, 5, 17)).await;
    fx.draft("Hidden", &[]).await;

    let found = fx
        .service
        .get_detail(2024, 5, 17, "hello-world")
        .await
        .unwrap();
    assert_eq!(found.id, post.id);

    let wrong_day = fx.service.get_detail(2024, 5, 18, "hello-world").await;
    assert!(matches!(wrong_day, Err(DomainError::NotFound { .. })));

    let impossible = fx.service.get_detail(2024, 2, 30, "hello-world").await;
    assert!(matches!(impossible, Err(DomainError::NotFound { .. })));

    let draft = fx.service.get_detail(2024, 5, 17, "hidden").await;
    assert!(matches!(draft, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn same_slug_on_same_day_is_rejected_and_detail_stays_reachable() {
    let fx = fixture();
    let first = fx
        .publish("Hello", &[], Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap())
        .await;

    let clash = Post::new(fx.author, "Hello", "body")
        .published_at(Utc.with_ymd_and_hms(2024, 5, 17, 18, 0, 0).unwrap());
    let err = fx.repos.posts.save(clash).await.unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));

    let found = fx.service.get_detail(2024, 5, 17, "hello").await.unwrap();
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn similar_posts_rank_by_shared_tags_then_date() {
    let fx = fixture();
    let rust = fx.tag("rust").await;
    let web = fx.tag("web").await;
    let db = fx.tag("db").await;

    let source = fx.publish("Source", &[&rust, &web, &db], day(2024, 6, 1)).await;
    fx.publish("Two shared, old", &[&rust, &web], day(2020, 1, 1)).await;
    fx.publish("One shared, new", &[&db], day(2024, 5, 30)).await;
    fx.publish("Unrelated", &[], day(2024, 5, 29)).await;
    fx.draft("Draft shares all", &[&rust, &web, &db]).await;

    let similar = fx.service.similar_posts(&source, 4).await.unwrap();
    let titles: Vec<_> = similar.iter().map(|p| p.title.as_str()).collect();

    assert_eq!(titles, vec!["Two shared, old", "One shared, new"]);
    assert!(similar.iter().all(|p| p.id != source.id && p.is_published()));
}

#[tokio::test]
async fn invalid_comment_is_not_persisted() {
    let fx = fixture();
    let post = fx.publish("Post", &[], day(2024, 1, 1)).await;

    let form = CommentForm {
        body: String::new(),
        ..valid_comment()
    };
    let outcome = fx.service.submit_comment(&post, &form).await.unwrap();

    match outcome {
        CommentSubmission::Rejected(errors) => assert!(errors.has_field("body")),
        CommentSubmission::Accepted(_) => panic!("comment should be rejected"),
    }
    assert_eq!(fx.repos.comments.count_by_post(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn valid_comment_is_stored_and_listed() {
    let fx = fixture();
    let post = fx.publish("Post", &[], day(2024, 1, 1)).await;

    let outcome = fx
        .service
        .submit_comment(&post, &valid_comment())
        .await
        .unwrap();
    let CommentSubmission::Accepted(comment) = outcome else {
        panic!("comment should be accepted");
    };
    assert!(comment.active);
    assert_eq!(fx.repos.comments.count_by_post(post.id).await.unwrap(), 1);

    let detail = fx.service.post_detail(post, None).await.unwrap();
    assert_eq!(detail.comments.count, 1);
    assert_eq!(detail.comments.items[0].id, comment.id);
}

#[tokio::test]
async fn inactive_comments_are_hidden() {
    let fx = fixture();
    let post = fx.publish("Post", &[], day(2024, 1, 1)).await;

    let CommentSubmission::Accepted(mut comment) = fx
        .service
        .submit_comment(&post, &valid_comment())
        .await
        .unwrap()
    else {
        panic!("comment should be accepted");
    };
    comment.active = false;
    fx.repos.comments.save(comment).await.unwrap();

    let page = fx.service.active_comments(&post, None).await.unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn share_sends_composed_mail() {
    let fx = fixture();
    let post = fx.publish("Ownership", &[], day(2024, 3, 9)).await;

    let shareable = fx.service.find_shareable(post.id).await.unwrap();
    let url = format!("http://blog.test{}", shareable.absolute_url());
    let form = EmailPostForm {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        to: "bob@example.com".into(),
        comments: "must read".into(),
    };

    let outcome = fx.service.share_post(&shareable, &url, &form).await.unwrap();
    assert!(matches!(outcome, ShareOutcome::Sent));

    let outbox = fx.mailer.outbox().await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(
        outbox[0].subject,
        "Ann (ann@example.com) recommends you reading \"Ownership\""
    );
    assert_eq!(
        outbox[0].body,
        "Read \"Ownership\" at http://blog.test/blog/2024/3/9/ownership/\n\nAnn's comments: must read"
    );
    assert_eq!(outbox[0].from, "admin@myblog.com");
    assert_eq!(outbox[0].to, vec!["bob@example.com".to_string()]);
}

#[tokio::test]
async fn invalid_share_sends_nothing() {
    let fx = fixture();
    let post = fx.publish("Post", &[], day(2024, 3, 9)).await;
    let form = EmailPostForm {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        to: "not-an-email".into(),
        comments: String::new(),
    };

    let outcome = fx.service.share_post(&post, "http://x", &form).await.unwrap();
    match outcome {
        ShareOutcome::Rejected(errors) => assert!(errors.has_field("to")),
        ShareOutcome::Sent => panic!("share should be rejected"),
    }
    assert!(fx.mailer.outbox().await.is_empty());
}

#[tokio::test]
async fn drafts_cannot_be_shared() {
    let fx = fixture();
    let draft = fx.draft("Draft", &[]).await;

    let err = fx.service.find_shareable(draft.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn sitemap_lists_published_posts() {
    let fx = fixture();
    fx.publish("Visible", &[], day(2024, 4, 2)).await;
    fx.draft("Invisible", &[]).await;

    let xml = fx.service.sitemap("https://blog.test").await.unwrap();
    assert!(xml.contains("<loc>https://blog.test/blog/2024/4/2/visible/</loc>"));
    assert!(!xml.contains("invisible"));
}
