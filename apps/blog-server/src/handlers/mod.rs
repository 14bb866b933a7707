//! HTTP handlers and route configuration.

mod health;
mod posts;
mod share;
mod sitemap;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/sitemap.xml", web::get().to(sitemap::sitemap))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(posts::post_list))
                .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
                .route("/{id}/share/", web::get().to(share::share_form))
                .route("/{id}/share/", web::post().to(share::share_submit))
                .route(
                    "/{year}/{month}/{day}/{slug}/",
                    web::get().to(posts::post_detail),
                )
                .route(
                    "/{year}/{month}/{day}/{slug}/",
                    web::post().to(posts::post_comment),
                ),
        );
}
