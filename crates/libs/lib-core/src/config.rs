//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The [`Config`] is built once in `main`, then handed to the router as part of the
//! application state. Nothing reads configuration from a global.
//!
//! ## Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDRESS` | `127.0.0.1:3000` |
//! | `HOTEL_RPC_URL` | `http://localhost:8545` |
//! | `INDEX_ADDRESS` | required |
//! | `GAS_MARGIN` | `1.5` |
//! | `KEYSTORE_PATH` | `keys/keystore.json` |
//! | `SDK_TIMEOUT_SECS` | `60` |
//! | `WHITELIST` | empty (allow every peer) |
//! | `HOTEL_MANAGER_MODE` | `rpc` |
//! | `MEMORY_HOTELS` | empty (memory mode only) |
//! | `ALLOWED_ORIGINS` | local development origins |

use crate::model::Address;
use lib_utils::envs::{get_env, get_env_list, get_env_or, get_env_parse_or};
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which hotel client implementation the server talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerMode {
    /// JSON-RPC bridge at `HOTEL_RPC_URL`.
    Rpc,
    /// In-process ledger for local development.
    Memory,
}

impl FromStr for ManagerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rpc" => Ok(ManagerMode::Rpc),
            "memory" => Ok(ManagerMode::Memory),
            other => Err(format!("HOTEL_MANAGER_MODE must be 'rpc' or 'memory', got '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Socket address the HTTP server binds to
    pub bind_address: String,

    /// Endpoint of the hotel-manager JSON-RPC bridge
    pub rpc_url: String,

    /// Address of the hotel index contract every client is bound to
    pub index_address: Address,

    /// Multiplier applied to estimated gas for every transaction
    ///
    /// Valid range: 1.0 to 10.0
    pub gas_margin: f64,

    /// Location of the encrypted owner keystore
    pub keystore_path: PathBuf,

    /// Upper bound on a single hotel client call
    pub sdk_timeout: Duration,

    /// Peers allowed to reach the API. Empty allows everyone.
    pub whitelist: Vec<IpAddr>,

    /// Hotel client implementation
    pub manager_mode: ManagerMode,

    /// Hotels created at startup in memory mode, managed by the keystore's address
    pub memory_hotels: Vec<Address>,

    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let bind_address = get_env_or("BIND_ADDRESS", "127.0.0.1:3000");
        let rpc_url = get_env_or("HOTEL_RPC_URL", "http://localhost:8545");

        let index_address = get_env("INDEX_ADDRESS")
            .map_err(|e| e.to_string())?
            .parse::<Address>()
            .map_err(|e| format!("INDEX_ADDRESS is not a valid address: {}", e))?;

        let gas_margin = get_env_parse_or("GAS_MARGIN", 1.5_f64).map_err(|e| e.to_string())?;

        let keystore_path = PathBuf::from(get_env_or("KEYSTORE_PATH", "keys/keystore.json"));

        let sdk_timeout_secs =
            get_env_parse_or("SDK_TIMEOUT_SECS", 60_u64).map_err(|e| e.to_string())?;

        let whitelist = get_env_list("WHITELIST")
            .iter()
            .map(|ip| {
                ip.parse::<IpAddr>()
                    .map_err(|_| format!("WHITELIST entry '{}' is not an IP address", ip))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let manager_mode = get_env_or("HOTEL_MANAGER_MODE", "rpc").parse()?;

        let memory_hotels = get_env_list("MEMORY_HOTELS")
            .iter()
            .map(|hotel| {
                hotel
                    .parse::<Address>()
                    .map_err(|e| format!("MEMORY_HOTELS entry '{}' is not an address: {}", hotel, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut allowed_origins = get_env_list("ALLOWED_ORIGINS");
        if allowed_origins.is_empty() {
            allowed_origins = default_origins();
        }

        Ok(Self {
            bind_address,
            rpc_url,
            index_address,
            gas_margin,
            keystore_path,
            sdk_timeout: Duration::from_secs(sdk_timeout_secs),
            whitelist,
            manager_mode,
            memory_hotels,
            allowed_origins,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(1.0..=10.0).contains(&self.gas_margin) {
            return Err("GAS_MARGIN must be between 1.0 and 10.0".to_string());
        }

        let secs = self.sdk_timeout.as_secs();
        if secs < 1 || secs > 600 {
            return Err("SDK_TIMEOUT_SECS must be between 1 and 600".to_string());
        }

        if self.manager_mode == ManagerMode::Rpc
            && !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://"))
        {
            return Err("HOTEL_RPC_URL must be an http(s) URL".to_string());
        }

        if self.keystore_path.as_os_str().is_empty() {
            return Err("KEYSTORE_PATH cannot be empty".to_string());
        }

        Ok(())
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            index_address: Address::ZERO,
            gas_margin: 1.5,
            keystore_path: PathBuf::from("keys/keystore.json"),
            sdk_timeout: Duration::from_secs(60),
            whitelist: Vec::new(),
            manager_mode: ManagerMode::Rpc,
            memory_hotels: Vec::new(),
            allowed_origins: default_origins(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_gas_margin_bounds() {
        let config = Config { gas_margin: 0.5, ..base_config() };
        assert_eq!(
            config.validate().unwrap_err(),
            "GAS_MARGIN must be between 1.0 and 10.0"
        );
    }

    #[test]
    fn test_timeout_bounds() {
        let config = Config { sdk_timeout: Duration::from_secs(0), ..base_config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_mode_ignores_rpc_url() {
        let config = Config {
            manager_mode: ManagerMode::Memory,
            rpc_url: "not a url".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_manager_mode_parsing() {
        assert_eq!("RPC".parse::<ManagerMode>(), Ok(ManagerMode::Rpc));
        assert_eq!(" memory ".parse::<ManagerMode>(), Ok(ManagerMode::Memory));
        assert!("ganache".parse::<ManagerMode>().is_err());
    }
}
