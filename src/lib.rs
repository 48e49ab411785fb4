pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod validation;

use actix_web::web;

use crate::error::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    cfg.route("/health", web::get().to(handlers::health_check))

        .route("/auth/facebook", web::get().to(handlers::auth::facebook_login))
        .route("/auth/facebook/callback", web::get().to(handlers::auth::facebook_callback))
        .route("/auth/me", web::get().to(handlers::auth::me))
        .route("/auth/logout", web::get().to(handlers::auth::logout))
        .route("/auth/logout", web::post().to(handlers::auth::logout))

        .route("/api/categories", web::get().to(handlers::business::get_categories))
        .route("/api/services", web::post().to(handlers::business::create_service))
        .route("/api/services", web::get().to(handlers::business::list_services))
        .route("/api/services/{id}", web::get().to(handlers::business::get_service))
        .route("/api/services/{id}/status", web::put().to(handlers::business::update_status))

        .route("/how-to-review", web::get().to(handlers::views::how_to_review))
        .route("/payment-success", web::get().to(handlers::views::payment_success))
        .default_service(web::to(handlers::views::not_found));
}
