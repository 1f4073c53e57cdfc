//! Snippetbox HTTP server.
//!
//! Server-rendered pastebin backed by `PostgreSQL`.

use anyhow::Context;
use snippetbox_core::SystemClock;
use snippetbox_postgres::{
    PostgresSessionStore, PostgresSnippetRepository, PostgresUserRepository, spawn_cleanup,
};
use snippetbox_web::routes::{Timeouts, build_router};
use snippetbox_web::{AppState, Config, TemplateCache};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snippetbox=info,snippetbox_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        error!(panic = %panic_info, %backtrace, "Panic");
    }));

    if let Err(e) = run().await {
        error!(error = format!("{e:#}"), "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Snippetbox");

    let config = Config::from_env();
    info!(
        addr = %config.addr,
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let pool = snippetbox_postgres::connect(&config.database.url, config.database.max_connections)
        .await
        .context("database unavailable")?;
    snippetbox_postgres::migrate(&pool)
        .await
        .context("migrations failed")?;
    info!("Database ready");

    let templates = TemplateCache::new().context("template cache failed to build")?;
    let pages: Vec<&str> = templates.page_names().collect();
    info!(?pages, "Templates compiled");

    let sessions = Arc::new(PostgresSessionStore::new(pool.clone()));
    let cleanup = spawn_cleanup(sessions.clone(), config.session_cleanup_interval);

    let state = AppState::new(
        Arc::new(PostgresSnippetRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool)),
        sessions,
        Arc::new(templates),
        config.session.clone(),
        Arc::new(SystemClock),
    );

    let timeouts = Timeouts {
        request: config.request_timeout,
        read: config.read_timeout,
    };
    let app = build_router(state, &config.static_dir, timeouts);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(address = %config.addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    cleanup.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
