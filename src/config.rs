use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::endpoints::DEFAULT_API_BASE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// What may appear in the JSON config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfigFile {
    address: Option<IpAddr>,
    port: Option<u16>,
    upstream_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    concerts_cache_ttl_secs: Option<u64>,
    track_list_cache_ttl_secs: Option<u64>,
    cache_capacity: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub address: IpAddr,
    pub port: u16,
    pub upstream_base_url: String,
    pub request_timeout_secs: u64,
    /// Zero disables caching of concerts.
    pub concerts_cache_ttl_secs: u64,
    /// Zero disables caching of track lists.
    pub track_list_cache_ttl_secs: u64,
    pub cache_capacity: u64,
}

impl From<GatewayConfigFile> for GatewayConfig {
    fn from(file_config: GatewayConfigFile) -> Self {
        GatewayConfig {
            address: file_config
                .address
                .unwrap_or(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: file_config.port.unwrap_or(8000),
            upstream_base_url: file_config
                .upstream_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout_secs: file_config.request_timeout_secs.unwrap_or(10),
            concerts_cache_ttl_secs: file_config.concerts_cache_ttl_secs.unwrap_or(60),
            track_list_cache_ttl_secs: file_config.track_list_cache_ttl_secs.unwrap_or(600),
            cache_capacity: file_config.cache_capacity.unwrap_or(10_000),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfigFile::default().into()
    }
}

impl GatewayConfig {
    /// Reads the JSON config at `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::warn!("Config file {} not found, using defaults", path.display());
                return Ok(GatewayConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let file_config: GatewayConfigFile = serde_json::from_str(contents)?;
        Ok(file_config.into())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn concerts_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.concerts_cache_ttl_secs)
    }

    pub fn track_list_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.track_list_cache_ttl_secs)
    }
}
