use crate::error::AppError;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://ppv.to";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const API_BASE_ENV: &str = "STREAMS_API_BASE";
pub const BIND_ADDR_ENV: &str = "STREAMS_BIND_ADDR";

pub const CACHE_TTL_SECS: i64 = 60;
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = read(API_BASE_ENV)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let bind_raw = read(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|e| {
            AppError::Config(format!("invalid {} '{}': {}", BIND_ADDR_ENV, bind_raw, e))
        })?;

        Ok(Self {
            api_base,
            bind_addr,
        })
    }

    pub fn streams_url(&self) -> String {
        format!("{}/api/streams", self.api_base)
    }

    pub fn live_url(&self, uri_name: &str) -> String {
        format!("{}/live/{}", self.api_base, urlencoding::encode(uri_name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}
