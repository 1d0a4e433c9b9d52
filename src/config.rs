use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "configs/config";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    pub max_connections: u32,
    /// Create the four tables on startup if they are missing
    pub migrate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: PathBuf,
    pub dot_binary: PathBuf,
}

/// Top-level keys of the older flat config layout. Each one that is present
/// overrides its grouped counterpart.
#[derive(Debug, Deserialize)]
struct FlatKeys {
    user: Option<String>,
    password: Option<String>,
    dbname: Option<String>,
    sslmode: Option<String>,
    /// Listen address such as `:8080`, `0.0.0.0:8080` or `8080`
    port: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "postgres".to_string(),
            sslmode: "prefer".to_string(),
            max_connections: 20,
            migrate: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("pictures/graph.png"),
            dot_binary: PathBuf::from("dot"),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file named by `KB_CONFIG`
    /// (default `configs/config`) and `KB_`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        let path = std::env::var("KB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path, true)
    }

    /// The file is required: a missing or malformed file is an error.
    pub fn load_from(path: &str, with_env: bool) -> Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name(path).required(true));

        // e.g. KB_DATABASE__PASSWORD
        if with_env {
            config = config.add_source(
                config::Environment::with_prefix("KB")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config = config.build()?;
        let flat: FlatKeys = config.clone().try_deserialize()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.apply_flat_keys(flat)?;
        Ok(app_config)
    }

    fn apply_flat_keys(&mut self, flat: FlatKeys) -> Result<()> {
        if let Some(user) = flat.user {
            self.database.user = user;
        }
        if let Some(password) = flat.password {
            self.database.password = password;
        }
        if let Some(dbname) = flat.dbname {
            self.database.dbname = dbname;
        }
        if let Some(sslmode) = flat.sslmode {
            self.database.sslmode = sslmode;
        }
        if let Some(listen) = flat.port {
            let (host, port) = parse_listen_address(&listen)?;
            if let Some(host) = host {
                self.server.host = host;
            }
            self.server.port = port;
        }
        Ok(())
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_listen_address(listen: &str) -> Result<(Option<String>, u16)> {
    let (host, port) = match listen.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => (Some(host.to_string()), port),
        Some((_, port)) => (None, port),
        None => (None, listen),
    };
    let port = port.trim().parse::<u16>().map_err(|e| {
        Error::ConfigUnreadable(config::ConfigError::Message(format!(
            "invalid listen port {:?}: {}",
            listen, e
        )))
    })?;
    Ok((host, port))
}
