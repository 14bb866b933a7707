//! Sitemap endpoint.

use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// GET /sitemap.xml
pub async fn sitemap(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let base = views::base_url(&req, &state);
    let xml = state.blog.sitemap(&base).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(xml))
}
