//! HTTP handlers and route configuration.

mod auth;
mod health;
mod likes;
mod posts;


use actix_web::web;
use std::sync::Arc;

use folio_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes. Like endpoints sit behind `limiter`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Option<Arc<dyn RateLimiter>>) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::list_mine))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}/status", web::get().to(posts::status_options))
                    .route("/{id}/status", web::put().to(posts::change_status))
                    .service(
                        web::resource("/{id}/likes")
                            .wrap(RateLimitMiddleware::new(limiter))
                            .route(web::get().to(likes::like_state))
                            .route(web::post().to(likes::like))
                            .route(web::delete().to(likes::unlike)),
                    ),
            ),
    );
}
