//! trustgate - content trust verification service
//!
//! Serves the verification pipeline and the verified-document store over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trustgate_common::config::{self, ConfigSource, TomlConfig};
use trustgate_common::db::init_database;

use trustgate_verify::extractors::HttpFetcher;
use trustgate_verify::judge::LlmJudge;
use trustgate_verify::services::{ChatCompletion, OpenAiClient, SqliteCorpusStore};
use trustgate_verify::{build_router, AppState, TrustPipeline};

/// Command-line arguments for trustgate
#[derive(Parser, Debug)]
#[command(name = "trustgate")]
#[command(about = "Content trust verification service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "TRUSTGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(short, long, env = "TRUSTGATE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Step 1: Load configuration (CLI → env → TOML → defaults)
    let config_path = config::resolve_config_path(args.config.as_deref());
    let (toml_config, config_source) = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    // Step 2: Initialize tracing, RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "trustgate={level},trustgate_verify={level},trustgate_common={level},tower_http={level}",
                    level = toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting trustgate v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Missing(path) => warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        ),
        ConfigSource::Defaults => info!("No config file found, using built-in defaults"),
    }

    // Step 3: Resolve root folder and open database
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    std::fs::create_dir_all(&root_folder).with_context(|| {
        format!("Failed to create root folder {}", root_folder.display())
    })?;
    let db_path = toml_config.database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db_pool = init_database(&db_path)
        .await
        .context("Failed to open database")?;

    // Step 4: Outbound clients
    let api_key = config::resolve_llm_api_key(&toml_config);
    let llm: Arc<dyn ChatCompletion> = Arc::new(
        OpenAiClient::new(&toml_config.llm, api_key).context("Failed to build LLM client")?,
    );
    let fetcher =
        Arc::new(HttpFetcher::new(&toml_config.fetch).context("Failed to build HTTP fetcher")?);
    let corpus = Arc::new(SqliteCorpusStore::new(
        db_pool.clone(),
        toml_config.verifier.corpus_min_level,
    ));
    let judge = Arc::new(LlmJudge::new(llm.clone()));

    // Step 5: Pipeline, router, server
    let pipeline = Arc::new(TrustPipeline::new(
        toml_config.verifier.clone(),
        fetcher,
        corpus,
        judge,
    ));
    let app = build_router(AppState::new(db_pool, pipeline, llm));

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Listening on http://{}:{}", host, port);
    info!("Health check: http://{}:{}/health", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
