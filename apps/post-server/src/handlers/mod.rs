//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
///
/// This is the registration hook that binds the six post operations and the
/// health probes onto the HTTP transport.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Probes
            .route("/health", web::get().to(health::health_check))
            .route("/health/ready", web::get().to(health::readiness))
            // Post operations
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::list_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .route(
                "/authors/{author_id}/posts",
                web::get().to(posts::list_posts_by_author),
            ),
    );
}
