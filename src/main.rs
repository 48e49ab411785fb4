use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use directory_backend::{config::Config, db, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("configuration error: {e}");
        std::io::Error::other(e)
    })?;
    info!(facebook = ?config.facebook, "configuration loaded");

    let pool = db::init_pool(&config.database_url).await.map_err(|e| {
        error!("failed to initialize database at {}: {e}", config.database_url);
        std::io::Error::other(e)
    })?;

    let port = config.port;
    let app_state = web::Data::new(AppState::new(pool, config));

    info!("listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .configure(directory_backend::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
