//! Post list and detail pages, including comment submission.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};

use quill_core::forms::CommentForm;
use quill_core::services::CommentSubmission;
use quill_shared::ApiResponse;
use quill_shared::dto::FormState;

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// `?page=` token, passed through unparsed.
///
/// Extraction never fails: a repeated key keeps its last value and an
/// undecodable query string counts as no token.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn parse(query_string: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
            .map(web::Query::into_inner)
            .unwrap_or_default();

        Self {
            page: pairs
                .into_iter()
                .rev()
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value),
        }
    }
}

impl FromRequest for PageQuery {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::parse(req.query_string())))
    }
}

type DetailPath = web::Path<(i32, u32, u32, String)>;

/// GET /blog/
pub async fn post_list(state: web::Data<AppState>, query: PageQuery) -> AppResult<HttpResponse> {
    let listing = state.blog.list_posts(None, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_list(&listing))))
}

/// GET /blog/tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let listing = state
        .blog
        .list_posts(Some(&tag_slug), query.page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_list(&listing))))
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: DetailPath,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state
        .blog
        .detail_page(year, month, day, &slug, query.page.as_deref())
        .await?;

    let body = views::post_detail(&detail, FormState::default(), None);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /blog/{year}/{month}/{day}/{slug}/
///
/// Invalid submissions re-render the page with the form errors and status 200.
pub async fn post_comment(
    state: web::Data<AppState>,
    path: DetailPath,
    query: PageQuery,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let form = form.into_inner();
    let post = state.blog.get_detail(year, month, day, &slug).await?;

    let outcome = state.blog.submit_comment(&post, &form).await?;
    let detail = state
        .blog
        .post_detail(post, query.page.as_deref())
        .await?;

    let response = match outcome {
        CommentSubmission::Accepted(comment) => {
            let body = views::post_detail(&detail, FormState::default(), Some(&comment));
            ApiResponse::ok_with_message(body, "Your comment has been added.")
        }
        CommentSubmission::Rejected(errors) => {
            let body = views::post_detail(&detail, views::form_state(&form, errors), None);
            ApiResponse::ok_with_message(body, "Please correct the errors below.")
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_keeps_last_value() {
        assert_eq!(PageQuery::parse("page=1&page=2").page.as_deref(), Some("2"));
        assert_eq!(PageQuery::parse("x=1&page=abc").page.as_deref(), Some("abc"));
        assert_eq!(PageQuery::parse("").page, None);
    }
}
