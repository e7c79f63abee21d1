//! HTTP handlers and route configuration.

mod ai;
mod analytics;
mod api_keys;
mod auth;
mod health;
mod posts;
mod public;

use actix_web::web;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            // Key-scoped read path for external sites
            .service(
                web::scope("/public")
                    .route("/posts", web::get().to(public::list_posts))
                    .route("/posts/{id}", web::get().to(public::get_post)),
            )
            .service(
                web::scope("/api-keys")
                    .route("", web::post().to(api_keys::create))
                    .route("", web::get().to(api_keys::list))
                    .route("/{key}", web::delete().to(api_keys::delete)),
            )
            .service(
                web::scope("/analytics")
                    .service(
                        web::resource("/track")
                            .wrap(RateLimitMiddleware)
                            .route(web::post().to(analytics::track)),
                    )
                    .route("/stats", web::get().to(analytics::account_stats))
                    .route("/stats/{post_id}", web::get().to(analytics::post_stats))
                    .route("/posts", web::get().to(analytics::all_post_stats))
                    .route("/comments/{post_id}", web::get().to(analytics::comments)),
            )
            .service(
                web::scope("/ai")
                    .route("/generate", web::post().to(ai::generate))
                    .route("/improve", web::post().to(ai::improve))
                    .route("/test", web::get().to(ai::test_connection)),
            ),
    );
}
