//! HTTP handlers and route configuration.

mod auth;
mod cache;
mod explore;
mod health;
mod posts;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
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
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/mine", web::get().to(posts::my_posts))
                    .route("/{id}", web::get().to(posts::get_post)),
            )
            // Explore
            .service(
                web::scope("/explore")
                    .route("/trending", web::get().to(explore::trending))
                    .route("/for-you", web::get().to(explore::for_you))
                    .route("/following", web::get().to(explore::following))
                    .route("/leaderboard", web::get().to(explore::leaderboard))
                    .route("/stats", web::get().to(explore::stats))
                    .route("/featured", web::get().to(explore::featured)),
            )
            // Cache diagnostics
            .service(
                web::scope("/cache")
                    .route("/posts", web::post().to(cache::create_and_cache))
                    .route("/posts", web::get().to(cache::probe)),
            ),
    );
}
