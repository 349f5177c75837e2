use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod repository;
mod routes;
mod utils;

use config::{Config, StoreBackend};
use db::init_db;
use repository::{FingerLogRepository, InMemoryFingerLogRepository, MySqlFingerLogRepository};
use utils::time_parse::{Zone, resolve_zone};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Finger log service is running"
}

async fn build_repository(
    config: &Config,
    zone: Zone,
) -> anyhow::Result<Arc<dyn FingerLogRepository>> {
    match config.store_backend {
        StoreBackend::MySql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db(url, config.db_max_connections).await?;
            Ok(Arc::new(MySqlFingerLogRepository::new(pool, zone)))
        }
        StoreBackend::Memory => {
            let mut repo = InMemoryFingerLogRepository::new(zone);
            for (nik, full_name) in &config.memory_roster {
                repo = repo.with_user(nik.as_str(), full_name.as_str())?;
            }
            info!(users = config.memory_roster.len(), "Using in-memory store");
            Ok(Arc::new(repo))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = ?config.store_backend, zone = %config.timezone, "Server starting...");

    let zone = resolve_zone(&config.timezone);
    info!(configured = %config.timezone, resolved = ?zone, "Service zone resolved");
    let repo = Data::from(build_repository(&config, zone).await?);

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(repo.clone())
            .app_data(Data::new(zone))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
