//! Data Transfer Objects - response types for the blog's pages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tag as shown next to posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

/// A post as shown in lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub publish: DateTime<Utc>,
    pub tags: Vec<TagResponse>,
}

/// A post with its full body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub body: String,
    pub author: Option<String>,
}

/// A published comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

/// Navigation data for a paginated sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_previous: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_number: Option<usize>,
}

/// A form as re-displayed to the reader: submitted values and per-field errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    pub values: BTreeMap<String, String>,
    pub errors: BTreeMap<String, Vec<String>>,
}

/// GET /blog/ and GET /blog/tag/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub page: PageMeta,
    pub tag: Option<TagResponse>,
}

/// GET and POST /blog/{year}/{month}/{day}/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub comments_page: PageMeta,
    pub comment_form: FormState,
    pub new_comment: Option<CommentResponse>,
    pub similar_posts: Vec<PostSummary>,
}

/// GET and POST /blog/{id}/share/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub post: PostSummary,
    pub form: FormState,
    pub sent: bool,
}
