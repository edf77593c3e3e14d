// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/verify", web::post().to(handlers::verify))
        .route("/compile", web::post().to(handlers::compile));
}
