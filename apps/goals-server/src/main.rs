//! # goals-server
//!
//! Serves the course goals REST API.
//!
//! ## Usage
//!
//! ```text
//! goals-server --config goals.toml
//! GOALS_BIND=127.0.0.1:8080 GOALS_STORE_BACKEND=memory goals-server
//! ```

mod config;
mod logging;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use goals_api::{build_router, AppState, GoalMetrics};
use goals_store::{GoalStore, JsonFileGoalStore, MemoryGoalStore};
use tokio::net::TcpListener;

use crate::config::{ServerConfig, StoreBackend, StoreConfig};

/// Course goals REST API server.
#[derive(Parser)]
#[command(name = "goals-server", version, about = "Course goals REST API server")]
struct Cli {
    /// Path to a TOML config file (defaults to ./goals.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overriding config and environment.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    logging::init(&config)?;

    let store = open_store(&config.store)?;
    tracing::info!(
        backend = %config.store.backend,
        data_dir = %config.store.data_dir.display(),
        "goal store ready"
    );

    let metrics = Arc::new(GoalMetrics::new());
    let app = build_router(AppState::new(store, metrics));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "goals API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("goals API shut down");
    Ok(())
}

fn open_store(config: &StoreConfig) -> Result<Arc<dyn GoalStore>> {
    match config.backend {
        StoreBackend::File => {
            let store = JsonFileGoalStore::open(&config.data_dir).with_context(|| {
                format!("failed to open goal store at {}", config.data_dir.display())
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryGoalStore::new())),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_backend_creates_data_dir() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("goals");
        let store = open_store(&StoreConfig {
            backend: StoreBackend::File,
            data_dir: data_dir.clone(),
        })
        .unwrap();

        assert_eq!(store.backend_tag(), "file");
        assert!(data_dir.is_dir());
        store.create("hello").await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[test]
    fn memory_backend_ignores_data_dir() {
        let store = open_store(&StoreConfig {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::from("/nonexistent/should/not/be/created"),
        })
        .unwrap();
        assert_eq!(store.backend_tag(), "memory");
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::parse_from(["goals-server", "--config", "x.toml", "--bind", "127.0.0.1:1"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.bind, Some("127.0.0.1:1".parse().unwrap()));
    }
}
