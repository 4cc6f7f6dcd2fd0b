// logging.rs: tracing subscriber setup.
//
// Console logs go to stderr, filtered by RUST_LOG (or the defaults below).
// When an access log path is configured, request lines from the API
// middleware are also appended there as JSON, one per line.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use goals_api::middleware::ACCESS_LOG_TARGET;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{LogFormat, ServerConfig};

const DEFAULT_DIRECTIVES: &str = "goals_api=info,goals_store=info,goals_server=info";

pub fn init(config: &ServerConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let console = match config.log_format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let access = match &config.access_log {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create access log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open access log {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_filter(Targets::new().with_target(ACCESS_LOG_TARGET, Level::INFO)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(filter))
        .with(access)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}
