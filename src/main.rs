use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod attendance;
mod auth;
mod backend;
mod config;
mod docs;
mod error;
mod model;
mod routes;
mod state;

use attendance::clock::{OffsetClock, SystemClock, TimeSource};
use attendance::monitor::WindowMonitor;
use backend::cache::StatusCache;
use backend::client::HttpBackend;
use config::Config;
use state::AppState;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let clock: Arc<dyn TimeSource> = match config.utc_offset_minutes {
        Some(minutes) => Arc::new(
            OffsetClock::from_minutes(minutes)
                .with_context(|| format!("UTC offset of {minutes} minutes is out of range"))?,
        ),
        None => Arc::new(SystemClock),
    };

    let backend = HttpBackend::new(
        &config.backend_url,
        Duration::from_secs(config.backend_timeout_secs),
    )
    .context("Failed to build attendance backend client")?;

    let monitor = WindowMonitor::new(clock);
    let monitor_task = monitor.start(Duration::from_secs(config.window_poll_secs));

    let state = Data::new(AppState {
        monitor,
        backend: Arc::new(backend),
        status_cache: StatusCache::new(Duration::from_secs(config.status_cache_ttl_secs)),
    });

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    // stop re-evaluating once the views are gone
    drop(monitor_task);
    info!("Server stopped");

    Ok(())
}
