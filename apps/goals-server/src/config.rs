// config.rs: Server configuration.
//
// Precedence, lowest to highest: built-in defaults, the TOML file
// (`--config`, or `goals.toml` in the working directory when present),
// `GOALS_*` environment variables, then command-line flags.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "goals.toml";

/// Top-level server configuration from goals.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Console log format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Append-only access log file. No file is written when unset.
    #[serde(default)]
    pub access_log: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_format: LogFormat::default(),
            access_log: None,
            store: StoreConfig::default(),
        }
    }
}

/// Goal store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory holding one JSON document per goal (file backend only).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    File,
    /// Nothing survives a restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend '{other}' (expected 'file' or 'memory')"),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{other}' (expected 'pretty' or 'json')"),
        }
    }
}

// Serde default functions
fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 80))
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".goals").join("data")
}

impl ServerConfig {
    /// Load configuration from `path` (or the default file if it exists),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let default_file = Path::new(DEFAULT_CONFIG_FILE);
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if default_file.exists() => Self::from_file(default_file)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Override fields from `GOALS_*` variables, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(bind) = lookup("GOALS_BIND") {
            self.bind = bind
                .parse()
                .with_context(|| format!("invalid GOALS_BIND '{bind}'"))?;
        }
        if let Some(format) = lookup("GOALS_LOG_FORMAT") {
            self.log_format = format.parse().context("invalid GOALS_LOG_FORMAT")?;
        }
        if let Some(path) = lookup("GOALS_ACCESS_LOG") {
            self.access_log = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(backend) = lookup("GOALS_STORE_BACKEND") {
            self.store.backend = backend.parse().context("invalid GOALS_STORE_BACKEND")?;
        }
        if let Some(dir) = lookup("GOALS_DATA_DIR") {
            self.store.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_listen_on_port_80_with_file_store() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.port(), 80);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.access_log.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind = "127.0.0.1:8080"

            [store]
            backend = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.data_dir, default_data_dir());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn full_toml_parses() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind = "0.0.0.0:3000"
            log_format = "json"
            access_log = "logs/access.log"

            [store]
            backend = "file"
            data_dir = "/var/lib/goals"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.access_log, Some(PathBuf::from("logs/access.log")));
        assert_eq!(config.store.data_dir, PathBuf::from("/var/lib/goals"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("GOALS_BIND", "127.0.0.1:9000"),
                ("GOALS_STORE_BACKEND", "memory"),
                ("GOALS_DATA_DIR", "/tmp/goals"),
                ("GOALS_LOG_FORMAT", "json"),
                ("GOALS_ACCESS_LOG", "access.log"),
            ]))
            .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/goals"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.access_log, Some(PathBuf::from("access.log")));
    }

    #[test]
    fn empty_access_log_env_disables_file() {
        let mut config = ServerConfig {
            access_log: Some(PathBuf::from("x.log")),
            ..ServerConfig::default()
        };
        config.apply_env(env(&[("GOALS_ACCESS_LOG", "")])).unwrap();
        assert!(config.access_log.is_none());
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let mut config = ServerConfig::default();
        assert!(config.apply_env(env(&[("GOALS_BIND", "not-an-addr")])).is_err());
        assert!(config
            .apply_env(env(&[("GOALS_STORE_BACKEND", "mongodb")]))
            .is_err());
        assert!(config.apply_env(env(&[("GOALS_LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn from_file_reports_path_on_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.toml");
        std::fs::write(&path, "bind = 42").unwrap();

        let err = ServerConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("goals.toml"));
    }

    #[test]
    fn from_file_reads_written_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.toml");
        std::fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }
}
