use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a blog article addressed by its publish date and slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub publish: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post. The slug is derived from the title.
    pub fn new(author_id: Uuid, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: slug::slugify(&title),
            title,
            body: body.into(),
            status: PostStatus::Draft,
            publish: now,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Mark the post as published at the given moment.
    pub fn published_at(mut self, publish: DateTime<Utc>) -> Self {
        self.status = PostStatus::Published;
        self.publish = publish;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar day (UTC) the post is addressed by.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path: `/blog/{year}/{month}/{day}/{slug}/`.
    pub fn absolute_url(&self) -> String {
        let date = self.publish_date();
        format!(
            "/blog/{}/{}/{}/{}/",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }

    pub fn has_tag(&self, tag_id: Uuid) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }
}
