//! Blog use cases: post queries, comments, sharing and the sitemap.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::DomainError;
use crate::forms::{CommentForm, EmailPostForm, FormErrors};
use crate::ports::{FormValidator, Mailer, Repositories};

use super::pagination::{Page, paginate};
use super::share::compose_share_mail;
use super::similarity::rank_similar;
use super::sitemap::render_sitemap;

/// Tunables for listing and sharing.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub posts_per_page: usize,
    pub comments_per_page: usize,
    pub similar_posts_limit: usize,
    /// Sender address of share emails.
    pub mail_from: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 3,
            comments_per_page: 3,
            similar_posts_limit: 4,
            mail_from: "admin@myblog.com".to_string(),
        }
    }
}

/// A page of the post list, with the tag it was filtered by.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Page<Post>,
    pub tag: Option<Tag>,
}

/// Everything shown on a post's page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: Option<User>,
    pub comments: Page<Comment>,
    pub similar_posts: Vec<Post>,
}

/// Result of a comment submission that reached validation.
#[derive(Debug, Clone)]
pub enum CommentSubmission {
    Accepted(Comment),
    Rejected(FormErrors),
}

/// Result of a share submission that reached validation.
#[derive(Debug, Clone)]
pub enum ShareOutcome {
    Sent,
    Rejected(FormErrors),
}

impl ShareOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ShareOutcome::Sent)
    }
}

/// Blog application service. All collaborators are injected.
pub struct BlogService {
    repos: Repositories,
    mailer: Arc<dyn Mailer>,
    comment_validator: Arc<dyn FormValidator<CommentForm>>,
    share_validator: Arc<dyn FormValidator<EmailPostForm>>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new<V>(
        repos: Repositories,
        mailer: Arc<dyn Mailer>,
        validator: Arc<V>,
        settings: BlogSettings,
    ) -> Self
    where
        V: FormValidator<CommentForm> + FormValidator<EmailPostForm> + 'static,
    {
        Self {
            repos,
            mailer,
            comment_validator: validator.clone(),
            share_validator: validator,
            settings,
        }
    }

    pub fn settings(&self) -> &BlogSettings {
        &self.settings
    }

    /// Published posts, newest first, optionally restricted to a tag.
    ///
    /// Fails with `NotFound` when `tag_slug` names no tag.
    pub async fn list_published(
        &self,
        tag_slug: Option<&str>,
    ) -> Result<(Vec<Post>, Option<Tag>), DomainError> {
        let tag = match tag_slug {
            Some(slug) => Some(
                self.repos
                    .tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Tag", slug))?,
            ),
            None => None,
        };

        let posts = self
            .repos
            .posts
            .find_published(tag.as_ref().map(|t| t.id))
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            count = posts.len(),
            "Listed published posts"
        );
        Ok((posts, tag))
    }

    /// One page of the published post list.
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let (posts, tag) = self.list_published(tag_slug).await?;
        Ok(PostListing {
            posts: paginate(posts, self.settings.posts_per_page, page),
            tag,
        })
    }

    /// The single published post addressed by date and slug.
    pub async fn get_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<Post, DomainError> {
        let key = format!("{year}/{month}/{day}/{slug}");
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("Post", key.clone()))?;

        let mut matches = self.repos.posts.find_published_on(date, slug).await?;
        if matches.len() != 1 {
            tracing::debug!(post = %key, matches = matches.len(), "No unique post for detail URL");
            return Err(DomainError::not_found("Post", key));
        }
        Ok(matches.remove(0))
    }

    /// Up to `limit` published posts sharing tags with `post`, most shared first.
    pub async fn similar_posts(&self, post: &Post, limit: usize) -> Result<Vec<Post>, DomainError> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }
        let tag_ids: Vec<Uuid> = post.tags.iter().map(|t| t.id).collect();
        let candidates = self
            .repos
            .posts
            .find_published_with_any_tag(&tag_ids, post.id)
            .await?;

        Ok(rank_similar(post, candidates, limit))
    }

    /// One page of a post's active comments, oldest first.
    pub async fn active_comments(
        &self,
        post: &Post,
        page: Option<&str>,
    ) -> Result<Page<Comment>, DomainError> {
        let comments = self.repos.comments.find_active_by_post(post.id).await?;
        Ok(paginate(comments, self.settings.comments_per_page, page))
    }

    /// Assemble the page state of a resolved post.
    pub async fn post_detail(
        &self,
        post: Post,
        comment_page: Option<&str>,
    ) -> Result<PostDetail, DomainError> {
        let author = self.repos.users.find_by_id(post.author_id).await?;
        let comments = self.active_comments(&post, comment_page).await?;
        let similar_posts = self
            .similar_posts(&post, self.settings.similar_posts_limit)
            .await?;

        Ok(PostDetail {
            post,
            author,
            comments,
            similar_posts,
        })
    }

    /// Resolve a detail URL and assemble its page state.
    pub async fn detail_page(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
        comment_page: Option<&str>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.get_detail(year, month, day, slug).await?;
        self.post_detail(post, comment_page).await
    }

    /// Validate and store a reader's comment on `post`.
    ///
    /// Nothing is written when validation fails.
    pub async fn submit_comment(
        &self,
        post: &Post,
        form: &CommentForm,
    ) -> Result<CommentSubmission, DomainError> {
        if let Err(errors) = self.comment_validator.validate(form) {
            tracing::debug!(post_id = %post.id, ?errors, "Comment rejected");
            return Ok(CommentSubmission::Rejected(errors));
        }

        let comment = Comment::new(
            post.id,
            form.name.clone(),
            form.email.clone(),
            form.body.clone(),
        );
        let saved = self.repos.comments.save(comment).await?;

        tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment added");
        Ok(CommentSubmission::Accepted(saved))
    }

    /// A published post that may be shared.
    pub async fn find_shareable(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(id)
            .await?
            .filter(Post::is_published)
            .ok_or_else(|| DomainError::not_found("Post", id.to_string()))
    }

    /// Validate the share form and mail the recommendation.
    pub async fn share_post(
        &self,
        post: &Post,
        post_url: &str,
        form: &EmailPostForm,
    ) -> Result<ShareOutcome, DomainError> {
        if let Err(errors) = self.share_validator.validate(form) {
            tracing::debug!(post_id = %post.id, ?errors, "Share rejected");
            return Ok(ShareOutcome::Rejected(errors));
        }

        let mail = compose_share_mail(post, post_url, form, &self.settings.mail_from);
        self.mailer.send(mail).await?;

        tracing::info!(post_id = %post.id, "Post shared by email");
        Ok(ShareOutcome::Sent)
    }

    /// `sitemap.xml` for all published posts.
    pub async fn sitemap(&self, base_url: &str) -> Result<String, DomainError> {
        let posts = self.repos.posts.find_published(None).await?;
        Ok(render_sitemap(base_url, &posts))
    }
}
