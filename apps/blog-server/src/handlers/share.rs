//! Share a post by email.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use quill_core::forms::{EmailPostForm, FormErrors};
use quill_core::services::ShareOutcome;
use quill_shared::ApiResponse;
use quill_shared::dto::{FormState, ShareResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// GET /blog/{id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.blog.find_shareable(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ShareResponse {
        post: views::post_summary(&post),
        form: FormState::default(),
        sent: false,
    })))
}

/// POST /blog/{id}/share/
pub async fn share_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<EmailPostForm>,
) -> AppResult<HttpResponse> {
    let post = state.blog.find_shareable(path.into_inner()).await?;
    let form = form.into_inner();
    let post_url = format!("{}{}", views::base_url(&req, &state), post.absolute_url());

    let outcome = state.blog.share_post(&post, &post_url, &form).await?;
    let sent = outcome.is_sent();
    let errors = match outcome {
        ShareOutcome::Sent => FormErrors::new(),
        ShareOutcome::Rejected(errors) => errors,
    };

    let body = ShareResponse {
        post: views::post_summary(&post),
        form: views::form_state(&form, errors),
        sent,
    };
    let response = if sent {
        ApiResponse::ok_with_message(
            body,
            format!("\"{}\" was successfully sent to {}.", post.title, form.to),
        )
    } else {
        ApiResponse::ok(body)
    };

    Ok(HttpResponse::Ok().json(response))
}
