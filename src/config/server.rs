//! HTTP listener configuration.

use crate::errors::Result;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Address the HTTP API listens on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl ServerSettings {
    /// `host:port` string accepted by `TcpListener::bind`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// `[server]` table as read from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct PartialServerSettings {
    /// Interface to bind
    pub host: Option<String>,
    /// TCP port
    pub port: Option<u16>,
}

impl PartialServerSettings {
    pub(crate) fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = Some(super::parse_port("SERVER_PORT", &port)?);
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> ServerSettings {
        let defaults = ServerSettings::default();
        ServerSettings {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
        }
    }
}
