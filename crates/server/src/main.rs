//! Filedeck Server
//!
//! Sandboxed file management over HTTP for browser-based editors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sandfs::FileService;
use server::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Filedeck - sandboxed file management over HTTP.
#[derive(Parser, Debug)]
#[command(name = "filedeck-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Directory to confine file operations to (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub root_dir: Option<PathBuf>,

    /// Directory of frontend assets to serve beside the API
    #[arg(long, value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, then layer env and CLI overrides on top.
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()?
    };
    config.apply_env_overrides();

    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(root_dir) = cli.root_dir {
        config.files.root_dir = root_dir;
    }
    if let Some(web_dir) = cli.web_dir {
        config.files.web_dir = Some(web_dir);
    }
    if cli.verbose {
        config.server.log_level = "debug".to_string();
    }

    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.server.log_level.as_str())
        .init();

    tracing::info!("Filedeck server starting...");

    std::fs::create_dir_all(&config.files.root_dir).with_context(|| {
        format!(
            "Failed to create root directory: {}",
            config.files.root_dir.display()
        )
    })?;
    let service = Arc::new(
        FileService::new(&config.files.root_dir).with_context(|| {
            format!(
                "Failed to open root directory: {}",
                config.files.root_dir.display()
            )
        })?,
    );
    tracing::info!(root = %service.root().display(), "sandbox root ready");

    let mut app = server::router(service)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    if let Some(web_dir) = &config.files.web_dir {
        if !web_dir.is_dir() {
            anyhow::bail!("web directory {} does not exist", web_dir.display());
        }
        tracing::info!(web_dir = %web_dir.display(), "serving frontend assets");
        app = app.fallback_service(ServeDir::new(web_dir));
    }

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    tracing::info!(addr = %config.server.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C, or SIGTERM on unix).
async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to register Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
}
