use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const APP_NAME: &str = "nutriplan-import";
pub const DEFAULT_LOCAL_STORE: &str = ".nutriplan.env";
pub const DEFAULT_EXTENSION_ID: &str = "nutriplan-import";

#[derive(Clone, Debug)]
pub struct Config {
    /// Bind address of the background daemon.
    pub server_addr: SocketAddr,
    /// Page-local settings file used by the one-shot importer.
    pub local_store_path: PathBuf,
    /// Synced settings file; `None` means the XDG default, resolved on use.
    pub sync_store_path: Option<PathBuf>,
    /// Namespace inside the synced store.
    pub extension_id: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let local_store_path = get("NUTRIPLAN_LOCAL_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORE));
        let sync_store_path = get("NUTRIPLAN_SYNC_STORE").map(PathBuf::from);
        let extension_id = get("NUTRIPLAN_EXTENSION_ID").unwrap_or_else(|| DEFAULT_EXTENSION_ID.to_string());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            local_store_path,
            sync_store_path,
            extension_id,
        })
    }

    pub fn sync_store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.sync_store_path {
            return Ok(path.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
        Ok(xdg_dirs.get_config_home().join(APP_NAME).join("sync.json"))
    }
}
