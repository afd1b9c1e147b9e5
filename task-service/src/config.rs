//! Service configuration from `HM_*` environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8002";
const DEFAULT_JWT_SECRET: &str = "dev-jwt-secret-change-me";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl ServiceConfig {
    /// Defaults with the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8002)),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("HM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".hm-data"));

        let raw_addr =
            std::env::var("HM_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("Invalid HM_BIND_ADDR '{}'", raw_addr))?;

        let jwt_secret = std::env::var("HM_JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        let token_ttl_minutes = std::env::var("HM_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);

        Ok(Self {
            data_dir,
            bind_addr,
            jwt_secret,
            token_ttl_minutes,
        })
    }
}
