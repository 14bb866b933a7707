//! Mapping from domain values to response DTOs.

use std::collections::BTreeMap;

use actix_web::HttpRequest;
use serde::Serialize;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::forms::FormErrors;
use quill_core::services::{Page, PostDetail, PostListing};
use quill_shared::dto::{
    CommentResponse, FormState, PageMeta, PostDetailResponse, PostListResponse, PostResponse,
    PostSummary, TagResponse,
};

use crate::state::AppState;

/// Absolute site root: the configured site URL, or the request's scheme and host.
pub fn base_url(req: &HttpRequest, state: &AppState) -> String {
    match &state.site_url {
        Some(url) => url.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn post_summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id.to_string(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: post.absolute_url(),
        publish: post.publish,
        tags: post.tags.iter().map(tag).collect(),
    }
}

fn post_response(post: &Post, author: Option<&User>) -> PostResponse {
    PostResponse {
        summary: post_summary(post),
        body: post.body.clone(),
        author: author.map(|u| u.username.clone()),
    }
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        name: comment.name.clone(),
        body: comment.body.clone(),
        created: comment.created_at,
    }
}

pub fn page_meta<T>(page: &Page<T>) -> PageMeta {
    PageMeta {
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        has_previous: page.has_previous(),
        has_next: page.has_next(),
        previous_page_number: page.previous_page_number(),
        next_page_number: page.next_page_number(),
    }
}

/// Submitted values paired with their validation errors.
pub fn form_state<F: Serialize>(form: &F, errors: FormErrors) -> FormState {
    let values = match serde_json::to_value(form) {
        Ok(serde_json::Value::Object(fields)) => fields
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    FormState {
        values,
        errors: errors.into_inner(),
    }
}

pub fn post_list(listing: &PostListing) -> PostListResponse {
    PostListResponse {
        posts: listing.posts.items.iter().map(post_summary).collect(),
        page: page_meta(&listing.posts),
        tag: listing.tag.as_ref().map(tag),
    }
}

pub fn post_detail(
    detail: &PostDetail,
    comment_form: FormState,
    new_comment: Option<&Comment>,
) -> PostDetailResponse {
    PostDetailResponse {
        post: post_response(&detail.post, detail.author.as_ref()),
        comments: detail.comments.items.iter().map(comment).collect(),
        comments_page: page_meta(&detail.comments),
        comment_form,
        new_comment: new_comment.map(comment),
        similar_posts: detail.similar_posts.iter().map(post_summary).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::forms::CommentForm;

    #[test]
    fn test_form_state_keeps_submitted_values() {
        let form = CommentForm {
            name: "Ann".into(),
            email: "nope".into(),
            body: String::new(),
        };
        let mut errors = FormErrors::new();
        errors.add("email", "Enter a valid email address.");

        let state = form_state(&form, errors);
        assert_eq!(state.values["name"], "Ann");
        assert_eq!(state.values["email"], "nope");
        assert_eq!(state.values["body"], "");
        assert_eq!(state.errors["email"], vec!["Enter a valid email address."]);
    }
}
