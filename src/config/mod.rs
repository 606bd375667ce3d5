//! Application configuration.
//!
//! Settings come from an optional TOML file and `DB_*` / `SERVER_*`
//! environment variables, with the environment taking precedence. The result
//! is an [`AppConfig`] built once in `main` and passed down explicitly.

/// Database configuration and connection management
pub mod database;

/// HTTP listener configuration
pub mod server;

pub use database::{DatabaseSettings, connect, create_tables};
pub use server::ServerSettings;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Config file read when `ORDER_DESK_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Fully resolved application settings.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection parameters
    pub database: DatabaseSettings,
    /// HTTP listener
    pub server: ServerSettings,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    database: database::PartialDatabaseSettings,
    #[serde(default)]
    server: server::PartialServerSettings,
}

impl AppConfig {
    /// Merges TOML contents (if any) with values from `lookup`.
    ///
    /// # Errors
    /// Returns `Error::Config` if the TOML is malformed, an environment value
    /// cannot be parsed, or a required database field is missing.
    pub fn from_sources<F>(toml_contents: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut file_config: FileConfig = match toml_contents {
            Some(contents) => toml::from_str(contents).map_err(|e| Error::Config {
                message: format!("Failed to parse config file: {e}"),
            })?,
            None => FileConfig::default(),
        };

        file_config.database.apply_env(&lookup)?;
        file_config.server.apply_env(&lookup)?;

        Ok(Self {
            database: file_config.database.finish()?,
            server: file_config.server.finish(),
        })
    }
}

/// Loads the configuration file at `path` (if it exists) and applies the
/// process environment on top of it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`], reading overrides from `lookup` instead of the
/// process environment.
///
/// # Errors
/// Returns `Error::Config` if the file exists but cannot be read, or if
/// [`AppConfig::from_sources`] rejects the merged settings.
pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<AppConfig>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => {
            debug!("Loaded configuration file {:?}", path);
            Some(contents)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration file at {:?}, using environment only", path);
            None
        }
        Err(e) => {
            return Err(Error::Config {
                message: format!("Failed to read config file {path:?}: {e}"),
            });
        }
    };

    AppConfig::from_sources(contents.as_deref(), lookup)
}

/// Loads the configuration from `ORDER_DESK_CONFIG` or [`DEFAULT_CONFIG_PATH`].
pub fn load_app_configuration() -> Result<AppConfig> {
    let path =
        std::env::var("ORDER_DESK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?;
    info!(
        "Configuration loaded: database {}:{}/{}, listening on {}",
        config.database.host,
        config.database.port,
        config.database.name,
        config.server.bind_address()
    );
    Ok(config)
}

pub(crate) fn parse_port(key: &str, value: &str) -> Result<u16> {
    value.trim().parse().map_err(|e| Error::Config {
        message: format!("{key} must be a port number, got {value:?}: {e}"),
    })
}

pub(crate) fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            message: format!("{key} must be a boolean, got {value:?}"),
        }),
    }
}
